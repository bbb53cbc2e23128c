//! Scheduled jobs triggered by the cron endpoint.

mod mark_overdue_invoices;
mod send_due_reminders;

pub use mark_overdue_invoices::{MarkOverdueInvoicesHandler, OverdueSummary};
pub use send_due_reminders::{ReminderSummary, SendDueRemindersHandler};
