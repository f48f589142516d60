//! Print job types and collaborator seams

use async_trait::async_trait;
use comanda_printer::PrintResult;
use shared::order::{Order, OrderLine};

/// Ticket layout configuration
#[derive(Debug, Clone)]
pub struct TicketConfig {
    /// Paper width in characters (58mm = 32, 80mm = 48)
    pub width: usize,
    /// Restaurant display name printed in the header
    pub display_name: String,
}

impl Default for TicketConfig {
    fn default() -> Self {
        Self {
            width: 48,
            display_name: String::new(),
        }
    }
}

/// One queued print job
///
/// Ephemeral: created for a single print cycle and dropped afterwards.
/// For bill requests `items` holds the table's consolidated lines, not the
/// synthetic request line.
#[derive(Debug, Clone)]
pub struct PrintJob {
    /// Lines to print
    pub items: Vec<OrderLine>,
    /// Order the ticket belongs to
    pub order: Order,
    pub ticket_config: TicketConfig,
}

impl PrintJob {
    /// Amount to print on a bill ticket.
    ///
    /// The bill-request order itself carries a zero total; the printable
    /// amount is the sum of the consolidated lines.
    pub fn bill_total(&self) -> f64 {
        self.items.iter().map(|l| l.line_total()).sum()
    }
}

/// Renders a job into a printable document. Synchronous and side-effect-free.
pub trait TicketRenderer: Send + Sync {
    fn render(&self, job: &PrintJob) -> PrintResult<Vec<u8>>;
}

/// Sends a rendered document to a printer. May fail; a failure must not
/// crash the queue.
#[async_trait]
pub trait PrintDispatcher: Send + Sync {
    async fn dispatch(&self, document: &[u8]) -> PrintResult<()>;
}
