//! # comanda-printer
//!
//! ESC/POS thermal printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS command building
//! - Windows-1252 encoding for Spanish receipts (€, ñ, accents)
//! - Network printing (TCP port 9100)
//!
//! Business logic (WHAT to print) stays in application code: kitchen ticket
//! and bill rendering live in comanda-server's printing module.
//!
//! ## Example
//!
//! ```ignore
//! use comanda_printer::{TicketBuilder, NetworkPrinter, Printer};
//!
//! // Build ESC/POS content
//! let mut builder = TicketBuilder::new(48);
//! builder.center();
//! builder.double_size();
//! builder.line("COCINA");
//! builder.reset_size();
//! builder.sep_double();
//! builder.left();
//! builder.line("Mesa: 4");
//! builder.cut();
//!
//! // Send to network printer
//! let printer = NetworkPrinter::new("192.168.1.100", 9100)?;
//! printer.print(&builder.build()).await?;
//! ```

mod encoding;
mod error;
mod printer;
mod ticket;

// Re-exports
pub use encoding::{convert_to_cp1252, pad_1252, text_width, truncate_1252};
pub use error::{PrintError, PrintResult};
pub use printer::{NetworkPrinter, Printer};
pub use ticket::TicketBuilder;
