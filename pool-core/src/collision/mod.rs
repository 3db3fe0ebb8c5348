//! Contacts between balls and the table.
//!
//! This module handles:
//! - **Detection**: which cushions a ball has reached, which balls overlap
//! - **Resolution**: elastic cushion reflection; ball-ball contacts are
//!   reported but left unresolved
//!
//! Detection only reads positions. The simulation runs detection for every
//! ball before resolving anything, so a tick's outcome never depends on the
//! order the balls are stored in.
//!
//! ```text
//!        Top (max_y)
//!   ┌─────────────────┐
//!   │                 │
//!   │  ●──→   ←──●    │  Left (min_x)   Right (max_x)
//!   │                 │
//!   └─────────────────┘
//!       Bottom (min_y)
//! ```

pub mod detection;
pub mod resolution;

pub use detection::*;
pub use resolution::*;
