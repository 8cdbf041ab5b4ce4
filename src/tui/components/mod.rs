//! # TUI Components
//!
//! ## Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: top bar of the thread view
//! - `MessageView`: a single message
//! - `Ripples`: animated background of the entry form
//! - `LandingPage`: the entry form itself (borrows the shared `InputBox`)
//!
//! ## Stateful Components (Event-Driven)
//!
//! - `InputBox`: text entry, disabled while a reply is pending
//! - `MessageList`: scrollable thread with layout caching
//!
//! Components receive external data as props (struct fields or
//! constructor arguments), never by reaching into `App`.
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── title_bar.rs
//! ├── message.rs
//! ├── message_list.rs
//! ├── input_box.rs
//! ├── landing.rs
//! └── ripples.rs
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod input_box;
pub use input_box::{InputBox, InputEvent};
pub mod message;
pub use message::MessageView;
pub mod message_list;
pub use message_list::{MessageList, MessageListState};
pub mod landing;
pub use landing::LandingPage;
pub mod ripples;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Braille spinner glyph for an animation tick.
pub fn spinner_frame(tick: usize) -> &'static str {
    SPINNER[tick % SPINNER.len()]
}
