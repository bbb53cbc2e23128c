//! Customer email bodies.

use crate::ports::{DueReminderNotice, PaymentReceivedNotice};

/// Rendered email ready for a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

/// Formats minor units as rupiah with dot thousands separators: `Rp 110.000`.
pub fn format_rupiah(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-Rp {}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn payment_received(notice: &PaymentReceivedNotice) -> RenderedEmail {
    RenderedEmail {
        subject: format!("Payment received for invoice #{}", notice.invoice_number),
        html: format!(
            "<p>Hi {name},</p>\
             <p>Thank you! We have received your payment:</p>\
             <ul>\
             <li><strong>Invoice:</strong> #{number}</li>\
             <li><strong>Amount:</strong> {amount}</li>\
             <li><strong>Date:</strong> {date}</li>\
             <li><strong>Status:</strong> PAID</li>\
             </ul>\
             <p>Your invoice is now settled.</p>",
            name = escape(&notice.customer_name),
            number = escape(&notice.invoice_number),
            amount = format_rupiah(notice.amount),
            date = notice.payment_date.format("%d %B %Y"),
        ),
    }
}

pub fn due_reminder(notice: &DueReminderNotice) -> RenderedEmail {
    RenderedEmail {
        subject: format!(
            "Reminder: invoice #{} is due on {}",
            notice.invoice_number,
            notice.due_date.format("%d %B %Y")
        ),
        html: format!(
            "<p>Hi {name},</p>\
             <p>Invoice <strong>#{number}</strong> for <strong>{amount}</strong> \
             is due on <strong>{date}</strong>.</p>\
             <p>If you have already paid, please ignore this message.</p>",
            name = escape(&notice.customer_name),
            number = escape(&notice.invoice_number),
            amount = format_rupiah(notice.amount),
            date = notice.due_date.format("%d %B %Y"),
        ),
    }
}
