//! Locally held, render-stable entities.

use gridworld_types::{Position, SceneEntry, UserId};

/// An opaque visual object owned by the rendering layer.
///
/// The reconciliation engine never looks inside a handle. It only keeps it
/// attached across updates and calls [`dispose`](Self::dispose) when the
/// participant leaves the world.
pub trait RenderHandle {
    /// Release whatever the rendering layer allocated for this entity.
    fn dispose(self);
}

/// Headless clients render nothing.
impl RenderHandle for () {
    fn dispose(self) {}
}

/// The character data a client displays for one participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    /// The participant.
    pub user_id: UserId,
    /// Display name as last seen in a snapshot.
    pub name: String,
    /// Position as last seen in a snapshot.
    pub position: Position,
}

impl From<&SceneEntry> for Character {
    fn from(entry: &SceneEntry) -> Self {
        Self {
            user_id: entry.user_id.clone(),
            name: entry.name.clone(),
            position: entry.position,
        }
    }
}

/// One participant as held by a client, plus its optional render handle.
#[derive(Debug)]
pub struct LocalEntity<H> {
    id: UserId,
    character: Character,
    render: Option<H>,
}

impl<H> LocalEntity<H> {
    pub(crate) fn from_entry(entry: &SceneEntry) -> Self {
        Self {
            id: entry.user_id.clone(),
            character: Character::from(entry),
            render: None,
        }
    }

    /// Overwrite name and position in place, leaving the handle attached.
    pub(crate) fn refresh(&mut self, entry: &SceneEntry) {
        self.character.name.clone_from(&entry.name);
        self.character.position = entry.position;
    }

    pub(crate) const fn replace_render(&mut self, handle: H) -> Option<H> {
        self.render.replace(handle)
    }

    pub(crate) const fn take_render(&mut self) -> Option<H> {
        self.render.take()
    }

    /// The participant this entity represents.
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Displayed character data.
    pub const fn character(&self) -> &Character {
        &self.character
    }

    /// The attached render handle, if the rendering layer created one.
    pub const fn render(&self) -> Option<&H> {
        self.render.as_ref()
    }

    /// Mutable access to the attached render handle.
    pub const fn render_mut(&mut self) -> Option<&mut H> {
        self.render.as_mut()
    }
}
