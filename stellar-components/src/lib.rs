//! Reusable widgets for the Stellar Burgers TUI
//!
//! - [`modal`]: overlay chrome with backdrop dimming and hit-testing
//! - [`text_input`]: single-line input with cursor editing and masking

pub mod modal;
pub mod text_input;

pub use modal::{centered_rect, modal_hit, render_modal, ModalHit, ModalStyle};
pub use text_input::{TextInput, TextInputProps};
