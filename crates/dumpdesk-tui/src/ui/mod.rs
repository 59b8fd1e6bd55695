//! Terminal UI module using ratatui.
//!
//! This module provides the TUI rendering and input handling:
//!
//! - `render`: Route selection, frame layout and overlays
//! - `input`: Keyboard event handling
//! - `styles`: Color schemes and text styling
//! - `tabs`: Page content (home, admins, customers, drivers, products)

pub mod input;
pub mod render;
pub mod styles;
pub mod tabs;
