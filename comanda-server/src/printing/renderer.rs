//! Ticket rendering and dispatch implementations
//!
//! Rendering decides WHAT to print (kitchen ticket, consolidated bill,
//! help notice); comanda-printer handles HOW (ESC/POS bytes, encoding,
//! the wire).

use super::types::{PrintDispatcher, PrintJob, TicketRenderer};
use crate::orders::classifier::{self, SystemRequest};
use async_trait::async_trait;
use comanda_printer::{NetworkPrinter, PrintResult, Printer, TicketBuilder};

fn format_price(amount: f64) -> String {
    // Spanish receipts use comma as the decimal separator
    format!("{:.2} €", amount).replace('.', ",")
}

/// ESC/POS renderer for kitchen tickets, bills and help notices
pub struct EscPosTicketRenderer;

impl EscPosTicketRenderer {
    fn render_kitchen(&self, job: &PrintJob) -> Vec<u8> {
        let mut b = TicketBuilder::new(job.ticket_config.width);
        b.center().double_size().line("COCINA").reset_size();
        b.center()
            .double_height()
            .line(&format!("Mesa: {}", job.order.table_label))
            .reset_size();
        b.sep_double().left();

        for line in &job.items {
            b.bold()
                .line(&format!("{}x {}", line.quantity, line.name))
                .bold_off();
            for option in line.selected_options.iter().flatten() {
                b.line(&format!("   + {}", option.option));
            }
            if let Some(notes) = line.notes.as_deref().filter(|n| !n.trim().is_empty()) {
                b.line(&format!("   >> {}", notes.trim()));
            }
        }

        b.sep_single();
        b.cut_feed(4);
        b.build()
    }

    fn render_bill(&self, job: &PrintJob) -> Vec<u8> {
        let config = &job.ticket_config;
        let mut b = TicketBuilder::new(config.width);
        if !config.display_name.is_empty() {
            b.center().bold().line(&config.display_name).bold_off();
        }
        b.center().double_height().line("CUENTA").reset_size();
        b.center()
            .line(&format!("Mesa: {}", job.order.table_label));
        b.sep_double().left();

        for line in &job.items {
            b.line_lr(
                &format!("{}x {}", line.quantity, line.name),
                &format_price(line.line_total()),
            );
        }

        b.sep_single();
        b.bold()
            .line_lr("TOTAL", &format_price(job.bill_total()))
            .bold_off();
        b.newline();
        b.center().line("Gracias por su visita");
        b.cut_feed(4);
        b.build()
    }

    fn render_help(&self, job: &PrintJob) -> Vec<u8> {
        let message = classifier::help_message(&job.order)
            .unwrap_or_else(|| classifier::DEFAULT_HELP_MESSAGE.to_string());

        let mut b = TicketBuilder::new(job.ticket_config.width);
        b.center().double_size().line("AVISO").reset_size();
        b.center()
            .double_height()
            .line(&format!("Mesa: {}", job.order.table_label))
            .reset_size();
        b.sep_double().left();
        b.line(&message);
        b.cut_feed(4);
        b.build()
    }
}

impl TicketRenderer for EscPosTicketRenderer {
    fn render(&self, job: &PrintJob) -> PrintResult<Vec<u8>> {
        let document = match classifier::classify(&job.order) {
            Some(SystemRequest::Bill) => self.render_bill(job),
            Some(SystemRequest::Help) => self.render_help(job),
            None => self.render_kitchen(job),
        };
        Ok(document)
    }
}

/// Dispatcher backed by a network thermal printer (TCP 9100)
pub struct NetworkDispatcher {
    printer: NetworkPrinter,
}

impl NetworkDispatcher {
    pub fn new(printer: NetworkPrinter) -> Self {
        Self { printer }
    }

    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        Ok(Self {
            printer: NetworkPrinter::from_addr(addr)?,
        })
    }
}

#[async_trait]
impl PrintDispatcher for NetworkDispatcher {
    async fn dispatch(&self, document: &[u8]) -> PrintResult<()> {
        self.printer.print(document).await
    }
}

/// Dispatcher that only logs; used when no printer is configured.
pub struct LogDispatcher;

#[async_trait]
impl PrintDispatcher for LogDispatcher {
    async fn dispatch(&self, document: &[u8]) -> PrintResult<()> {
        tracing::info!(bytes = document.len(), "No printer configured, ticket discarded");
        Ok(())
    }
}
