//! HTML bodies for the three notification kinds, plus the money/date display
//! formatting they share. All monetary figures arrive as minor-unit integers
//! and are shown as 2-decimal major units with the currency's symbol or code.

use crate::domain::invoice::Invoice;
use crate::domain::recipient::PLACEHOLDER;
use crate::domain::transfer::Transfer;
use chrono::DateTime;

/// Formats a minor-unit amount, e.g. `format_amount(250000, "usd")` ->
/// `"$2,500.00"`. Unknown currencies get an uppercased code prefix.
pub fn format_amount(minor: i64, currency: &str) -> String {
    let symbol = match currency.to_lowercase().as_str() {
        "usd" => "$".to_string(),
        "gbp" => "£".to_string(),
        "eur" => "€".to_string(),
        "jpy" | "cny" => "¥".to_string(),
        "inr" => "₹".to_string(),
        "aud" => "A$".to_string(),
        "cad" => "C$".to_string(),
        "chf" => "CHF ".to_string(),
        other => format!("{} ", other.to_uppercase()),
    };
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    let major = abs / 100;
    let cents = abs % 100;
    format!("{sign}{symbol}{}.{cents:02}", group_thousands(major))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Formats a unix timestamp as e.g. `"Monday, January 5, 2026"` (UTC).
pub fn format_date(unix_secs: i64) -> String {
    DateTime::from_timestamp(unix_secs, 0)
        .map(|dt| dt.format("%A, %B %-d, %Y").to_string())
        .unwrap_or_else(|| PLACEHOLDER.into())
}

fn base(content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8"/>
<meta name="viewport" content="width=device-width,initial-scale=1.0"/>
<title>PayGlobal</title>
<style>
  body,html{{margin:0;padding:0;background:#f0f2f7;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,Helvetica,Arial,sans-serif}}
  a{{color:#5b8af0;text-decoration:none}}
</style>
</head>
<body style="margin:0;padding:0;background:#f0f2f7">
<table width="100%" cellpadding="0" cellspacing="0" border="0" style="background:#f0f2f7">
<tr><td align="center" style="padding:40px 16px">
<table width="100%" cellpadding="0" cellspacing="0" border="0" style="max-width:580px">
  <tr><td align="center" style="padding-bottom:24px">
    <div style="font-size:20px;font-weight:800;color:#1a1f36">🌍 PayGlobal</div>
    <div style="font-size:11px;color:#8a94a6;letter-spacing:.5px;text-transform:uppercase">Cross-Border Payouts</div>
  </td></tr>
  <tr><td style="background:#ffffff;border-radius:18px;padding:40px;box-shadow:0 4px 24px rgba(0,0,0,.07)">
    {content}
  </td></tr>
  <tr><td style="padding:24px 0;text-align:center">
    <div style="font-size:12px;color:#8a94a6">
      Powered by <strong>PayGlobal</strong><br/>
      This is an automated email. Please do not reply directly.
    </div>
  </td></tr>
</table>
</td></tr>
</table>
</body>
</html>"#
    )
}

fn status_pill(label: &str, color: &str, bg: &str) -> String {
    format!(
        r#"<span style="display:inline-block;background:{bg};color:{color};border-radius:20px;padding:4px 14px;font-size:12px;font-weight:700">{label}</span>"#
    )
}

fn data_row(label: &str, value: &str) -> String {
    format!(
        r#"<tr>
    <td style="padding:11px 0;border-bottom:1px solid #f0f2f7;font-size:13px;color:#8a94a6;width:45%">{label}</td>
    <td style="padding:11px 0;border-bottom:1px solid #f0f2f7;font-size:13px;color:#1a1f36;font-weight:600;text-align:right">{value}</td>
  </tr>"#
    )
}

fn amount_badge(minor: i64, currency: &str, gradient: &str) -> String {
    format!(
        r#"<div style="background:{gradient};border-radius:12px;padding:24px;text-align:center;margin:24px 0">
    <div style="font-size:11px;color:#8a94a6;font-weight:700;letter-spacing:1px;text-transform:uppercase">Transfer Amount</div>
    <div style="font-size:40px;font-weight:800;color:#1a1f36;font-family:Courier New,monospace">{}</div>
    <div style="font-size:12px;color:#8a94a6">{}</div>
  </div>"#,
        format_amount(minor, currency),
        currency.to_uppercase(),
    )
}

fn bank_display(bank_name: &str, last4: &str) -> String {
    if bank_name == PLACEHOLDER {
        PLACEHOLDER.into()
    } else {
        format!("{bank_name} ···{last4}")
    }
}

/// Body for the notification sent to the platform operator when a transfer
/// is recorded.
pub fn payment_initiated(transfer: &Transfer) -> String {
    let content = format!(
        r#"<div style="margin-bottom:24px">{pill}</div>
  <h1 style="margin:0 0 8px;font-size:24px;font-weight:800;color:#1a1f36">Payment Initiated</h1>
  <p style="margin:0 0 24px;color:#8a94a6;font-size:15px">Your transfer has been recorded and is awaiting the manual payout.</p>
  {badge}
  <table width="100%" cellpadding="0" cellspacing="0" border="0" style="margin:0 0 24px">
    {rows}
  </table>
  <div style="background:#f8f9fc;border-radius:10px;padding:16px;font-size:13px;color:#8a94a6">
    💡 <strong style="color:#1a1f36">What happens next?</strong><br/>
    Send the money through your bank or payout provider, then mark this transfer paid.
    The recipient has been notified that funds are on the way.
  </div>"#,
        pill = status_pill("⚡ Transfer Initiated", "#5b8af0", "#eef3ff"),
        badge = amount_badge(
            transfer.amount,
            &transfer.currency,
            "linear-gradient(135deg,#eef3ff,#f3eeff)"
        ),
        rows = [
            data_row("Transfer ID", &transfer.id),
            data_row("Recipient", &transfer.recipient_name),
            data_row("Recipient Email", &transfer.recipient_email),
            data_row("Bank", &bank_display(&transfer.bank_name, &transfer.last4)),
            data_row("Country", &transfer.country),
            data_row("Reference", &transfer.description),
            data_row("Initiated", &format_date(transfer.created)),
            data_row("Est. Arrival", &format_date(transfer.arrival_date)),
            data_row("Status", &status_pill("Processing", "#f5a623", "#fff8eb")),
        ]
        .join("\n    "),
    );
    base(&content)
}

/// Body for the notification sent to the recipient confirming funds are en
/// route.
pub fn payment_received(transfer: &Transfer) -> String {
    let content = format!(
        r#"<div style="text-align:center;margin-bottom:28px;font-size:32px">✅</div>
  <h1 style="margin:0 0 8px;font-size:24px;font-weight:800;color:#1a1f36;text-align:center">You've received a payment!</h1>
  <p style="margin:0 0 24px;color:#8a94a6;font-size:15px;text-align:center">Hi <strong>{name}</strong>, a payment has been sent to your bank account.</p>
  {badge}
  <table width="100%" cellpadding="0" cellspacing="0" border="0" style="margin:0 0 24px">
    {rows}
  </table>
  <div style="background:#ecfdf5;border:1px solid #a7f3d0;border-radius:10px;padding:16px;font-size:13px;color:#065f46">
    🏦 <strong>When will I see the money?</strong><br/>
    Depending on your country and bank, it typically takes <strong>1-5 business days</strong>
    for the money to appear in your account.
  </div>"#,
        name = transfer.recipient_name,
        badge = amount_badge(
            transfer.amount,
            &transfer.currency,
            "linear-gradient(135deg,#ecfdf5,#d1fae5)"
        ),
        rows = [
            data_row("From", &transfer.sender_name),
            data_row("Your Bank", &bank_display(&transfer.bank_name, &transfer.last4)),
            data_row("Reference", &transfer.description),
            data_row("Transfer ID", &transfer.id),
            data_row("Expected By", &format_date(transfer.arrival_date)),
            data_row("Status", &status_pill("✓ Funds Sent", "#0ec97f", "#ecfdf5")),
        ]
        .join("\n    "),
    );
    base(&content)
}

/// Body for an itemised invoice email.
pub fn invoice(invoice: &Invoice) -> String {
    let item_rows: String = invoice
        .items
        .iter()
        .map(|item| {
            format!(
                r#"<tr>
      <td style="padding:14px 0;border-bottom:1px solid #f0f2f7;font-size:13px;color:#1a1f36">{}</td>
      <td style="padding:14px 0;border-bottom:1px solid #f0f2f7;font-size:13px;color:#8a94a6;text-align:center">{}</td>
      <td style="padding:14px 0;border-bottom:1px solid #f0f2f7;font-size:13px;color:#8a94a6;text-align:right">{}</td>
      <td style="padding:14px 0;border-bottom:1px solid #f0f2f7;font-size:13px;color:#1a1f36;font-weight:700;text-align:right">{}</td>
    </tr>"#,
                item.description,
                item.quantity,
                format_amount(item.unit_price, &invoice.currency),
                format_amount(item.line_total(), &invoice.currency),
            )
        })
        .collect();

    let tax_row = if invoice.tax_rate > rust_decimal::Decimal::ZERO {
        format!(
            r#"<tr><td style="padding:8px 0;font-size:13px;color:#8a94a6">Tax ({}%)</td>
        <td style="padding:8px 0;font-size:13px;color:#1a1f36;font-weight:600;text-align:right">{}</td></tr>"#,
            invoice.tax_rate,
            format_amount(invoice.tax(), &invoice.currency),
        )
    } else {
        String::new()
    };

    let party = |title: &str, p: &crate::domain::invoice::Party| {
        format!(
            r#"<div style="font-size:10px;font-weight:700;color:#8a94a6;letter-spacing:1px;text-transform:uppercase;margin-bottom:10px">{title}</div>
      <div style="font-size:14px;font-weight:700;color:#1a1f36">{}</div>
      <div style="font-size:13px;color:#8a94a6">{}</div>
      <div style="font-size:13px;color:#8a94a6">{}</div>"#,
            p.name.as_deref().unwrap_or(PLACEHOLDER),
            p.email.as_deref().unwrap_or(""),
            p.address.as_deref().unwrap_or(""),
        )
    };

    let notes = invoice
        .notes
        .as_deref()
        .map(|n| {
            format!(
                r#"<div style="background:#f8f9fc;border-left:3px solid #5b8af0;padding:14px 16px;font-size:13px;color:#8a94a6">
    <strong style="color:#1a1f36">Notes:</strong><br/>{n}
  </div>"#
            )
        })
        .unwrap_or_default();

    let content = format!(
        r#"<table width="100%" cellpadding="0" cellspacing="0" border="0" style="margin-bottom:32px">
    <tr>
      <td><div style="font-size:28px;font-weight:800;color:#1a1f36">INVOICE</div>
          <div style="font-size:13px;color:#8a94a6;font-family:Courier New,monospace">#{number}</div></td>
      <td style="text-align:right">{pill}</td>
    </tr>
  </table>
  <table width="100%" cellpadding="0" cellspacing="0" border="0" style="margin-bottom:32px">
    <tr>
      <td style="vertical-align:top;width:50%;padding-right:20px">{from}</td>
      <td style="vertical-align:top;width:50%">{to}</td>
    </tr>
  </table>
  <table width="100%" cellpadding="0" cellspacing="0" border="0" style="background:#f8f9fc;border-radius:10px;margin-bottom:28px">
    <tr>
      <td style="padding:16px 20px;font-size:12px;color:#8a94a6">Issue Date<br/><span style="font-size:13px;color:#1a1f36;font-weight:700">{issued}</span></td>
      {due_cell}
      <td style="padding:16px 20px;font-size:12px;color:#8a94a6;text-align:right">Transfer Ref<br/><span style="font-size:11px;color:#5b8af0;font-family:Courier New,monospace">{transfer_ref}</span></td>
    </tr>
  </table>
  <table width="100%" cellpadding="0" cellspacing="0" border="0" style="margin-bottom:8px">
    <thead><tr style="border-bottom:2px solid #1a1f36">
      <th style="padding:10px 0;font-size:11px;color:#8a94a6;text-transform:uppercase;text-align:left">Description</th>
      <th style="padding:10px 0;font-size:11px;color:#8a94a6;text-transform:uppercase;text-align:center">Qty</th>
      <th style="padding:10px 0;font-size:11px;color:#8a94a6;text-transform:uppercase;text-align:right">Unit Price</th>
      <th style="padding:10px 0;font-size:11px;color:#8a94a6;text-transform:uppercase;text-align:right">Total</th>
    </tr></thead>
    <tbody>{item_rows}</tbody>
  </table>
  <table width="100%" cellpadding="0" cellspacing="0" border="0" style="margin-bottom:28px">
    <tr><td style="width:55%"></td><td style="width:45%">
      <table width="100%" cellpadding="0" cellspacing="0" border="0">
        <tr><td style="padding:8px 0;font-size:13px;color:#8a94a6">Subtotal</td>
            <td style="padding:8px 0;font-size:13px;color:#1a1f36;font-weight:600;text-align:right">{subtotal}</td></tr>
        {tax_row}
        <tr><td style="padding:4px 0;font-size:16px;font-weight:800;color:#1a1f36">TOTAL</td>
            <td style="padding:4px 0;font-size:20px;font-weight:800;color:#5b8af0;text-align:right">{total}</td></tr>
      </table>
    </td></tr>
  </table>
  {notes}"#,
        number = invoice.number(),
        pill = status_pill("✓ PAID", "#0ec97f", "#ecfdf5"),
        from = party("FROM", &invoice.sender),
        to = party("BILLED TO", &invoice.recipient),
        issued = format_date(invoice.issued_date),
        due_cell = invoice
            .due_date
            .map(|d| format!(
                r#"<td style="padding:16px 20px;font-size:12px;color:#8a94a6;text-align:center">Due Date<br/><span style="font-size:13px;color:#1a1f36;font-weight:700">{}</span></td>"#,
                format_date(d),
            ))
            .unwrap_or_default(),
        transfer_ref = invoice.transfer_id.as_deref().unwrap_or(PLACEHOLDER),
        subtotal = format_amount(invoice.subtotal(), &invoice.currency),
        total = format_amount(invoice.total(), &invoice.currency),
    );
    base(&content)
}
