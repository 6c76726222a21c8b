//! Stateful widgets driven by [`crate::event::UiEvent`]s.
//!
//! Widgets here hold state and react to events only; drawing them is
//! [`crate::ui`]'s job.

pub mod dropdown;
pub mod sidebar;

pub use dropdown::{Dropdown, DropdownOutcome};
pub use sidebar::{Row, Sidebar, SidebarEntry, SidebarOutcome, SidebarSection};
