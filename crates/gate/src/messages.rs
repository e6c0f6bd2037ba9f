//! Rejection notice keys and resolution.
//!
//! The gate emits notices by key; turning a key into player-facing text is
//! the localization layer's job. `DefaultMessages` is the built-in English
//! catalog for hosts without one.

/// One key per rejecting channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKey {
    MovementBlocked,
    ChatBlocked,
    CommandBlocked,
    AttackBlocked,
    EntityInteractBlocked,
    BlockBreakBlocked,
    BlockPlaceBlocked,
    ItemUseBlocked,
}

/// Resolves a notice key to player-facing text.
pub trait MessageResolver {
    fn resolve(&self, key: NoticeKey) -> String;
}

/// Built-in English notice catalog.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultMessages;

impl MessageResolver for DefaultMessages {
    fn resolve(&self, key: NoticeKey) -> String {
        match key {
            NoticeKey::MovementBlocked => "Please log in before moving!",
            NoticeKey::ChatBlocked => "Please log in before chatting!",
            NoticeKey::CommandBlocked => "Please log in before running commands!",
            NoticeKey::AttackBlocked => "Please log in before attacking!",
            NoticeKey::EntityInteractBlocked => "Please log in before interacting!",
            NoticeKey::BlockBreakBlocked => "Please log in before breaking blocks!",
            NoticeKey::BlockPlaceBlocked => "Please log in before placing blocks!",
            NoticeKey::ItemUseBlocked => "Please log in before using items!",
        }
        .to_string()
    }
}
