//! A render handle that draws to the log.

use gridworld_client::{Character, RenderHandle};
use gridworld_types::UserId;

/// Stand-in for a visual object: counts frames and logs its lifecycle.
#[derive(Debug)]
pub struct LogSprite {
    user_id: UserId,
    frames: u32,
}

impl LogSprite {
    /// Create a sprite for `user_id`.
    pub fn new(user_id: &UserId) -> Self {
        tracing::debug!(%user_id, "Sprite created");
        Self {
            user_id: user_id.clone(),
            frames: 0,
        }
    }

    /// Draw one frame of `character`.
    pub fn draw(&mut self, character: &Character) {
        self.frames = self.frames.saturating_add(1);
        tracing::trace!(
            user_id = %self.user_id,
            name = character.name,
            x = character.position.x,
            y = character.position.y,
            frame = self.frames,
            "draw"
        );
    }

    /// Frames drawn so far.
    pub const fn frames(&self) -> u32 {
        self.frames
    }
}

impl RenderHandle for LogSprite {
    fn dispose(self) {
        tracing::debug!(user_id = %self.user_id, frames = self.frames, "Sprite disposed");
    }
}
