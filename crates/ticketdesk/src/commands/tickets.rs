//! Ticket command handlers.

use chrono::{DateTime, Local, NaiveDate, Utc};
use tabled::Tabled;

use ticketdesk_core::metrics::trend;
use ticketdesk_core::{HourFilter, Ticket, TicketMetrics, TicketQuery, ViewFilter};

use crate::cli::{GlobalOpts, OutputFormat, TicketListArgs, TicketsArgs, TicketsCommand};
use crate::config::Session;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Sent")]
    sent: String,
    #[tabled(rename = "Site")]
    site: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Alarm")]
    alarm: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Recipients")]
    recipients: String,
}

impl TicketRow {
    fn new(t: &Ticket, color: bool) -> Self {
        Self {
            id: t.id.clone(),
            sent: local_time(t.email_sent_at),
            site: t.site_name.clone(),
            severity: output::paint_severity(t.severity, color),
            alarm: t.alarm_type.clone(),
            status: output::paint_status(t.status, color),
            recipients: t.recipients_label(),
        }
    }
}

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn detail(t: &Ticket, color: bool) -> String {
    let mut lines = vec![
        format!("ID:          {}", t.id),
        format!("Subject:     {}", t.email_subject),
        format!("Site:        {} ({})", t.site_name, t.site_id),
        format!("Alarm:       {} ({})", t.alarm_type, t.alarm_id),
        format!("Severity:    {}", output::paint_severity(t.severity, color)),
        format!("Status:      {}", output::paint_status(t.status, color)),
        format!("Sent:        {}", local_time(t.email_sent_at)),
        format!("Recipients:  {}", t.recipients_label()),
        format!("Created by:  {}", t.created_by.label()),
    ];
    if let Some(at) = t.resolved_at {
        lines.push(format!("Resolved:    {}", local_time(at)));
    }
    if let Some(ref notes) = t.notes {
        lines.push(format!("Notes:       {notes}"));
    }
    lines.push(String::new());
    lines.push(t.description.clone());
    lines.join("\n")
}

// ── Filters ─────────────────────────────────────────────────────────

fn query(args: &TicketListArgs) -> TicketQuery {
    TicketQuery {
        status: args.status.clone(),
        severity: args.severity.clone(),
        site_id: args.site_id.clone(),
        alarm_type: args.alarm_type.clone(),
        start_date: args.start_date.clone(),
        end_date: args.end_date.clone(),
        page: args.page,
        limit: args.limit,
        sort_by: args.sort_by.clone(),
        sort_order: args.sort_order.map(|o| o.as_str().to_owned()),
    }
}

/// Calendar filter for `tickets list`: today in local time unless
/// `--date` / `--hour` say otherwise.
fn view_filter(args: &TicketListArgs) -> Result<ViewFilter, CliError> {
    let mut filter = match args.date {
        Some(ref raw) => {
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                CliError::Validation {
                    field: "date".into(),
                    reason: format!("expected YYYY-MM-DD, got '{raw}'"),
                }
            })?;
            ViewFilter::for_date(date)
        }
        None => ViewFilter::today(&Local),
    };

    if let Some(ref raw) = args.hour {
        filter.hour = raw.parse::<HourFilter>().map_err(|e| CliError::Validation {
            field: "hour".into(),
            reason: e.to_string(),
        })?;
    }
    filter.show_all_history = args.all_history;
    Ok(filter)
}

fn summary(filter: &ViewFilter, shown: &TicketMetrics, overall: &TicketMetrics) -> String {
    let mut line = format!(
        "{} shown ({}): {} critical, {} open, {} resolved",
        shown.total,
        filter.label(),
        shown.critical,
        shown.open,
        shown.resolved,
    );
    if let Some(t) = trend(shown.total, overall.total) {
        line.push_str(&format!(" [{t}]"));
    }
    line
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: TicketsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_ticket_access(session)?;
    let service = &session.service;
    let color = output::should_color(&global.color);

    match args.command {
        TicketsCommand::List(list) => {
            let filter = view_filter(&list)?;

            let spinner = util::spinner("Loading tickets…", global.quiet);
            let fetched = service.get_all_tickets(&query(&list)).await;
            spinner.finish_and_clear();
            let tickets = fetched?;

            let visible: Vec<Ticket> = filter.apply(&tickets, &Local).into_iter().cloned().collect();
            let out = output::render_list(
                &global.output,
                &visible,
                |t| TicketRow::new(t, color),
                |t| t.id.clone(),
            );
            output::print_output(&out, global.quiet);

            if matches!(global.output, OutputFormat::Table) && !global.quiet {
                let shown = TicketMetrics::from_tickets(&visible);
                let overall = TicketMetrics::from_tickets(&tickets);
                eprintln!("{}", summary(&filter, &shown, &overall));
            }
            Ok(())
        }

        TicketsCommand::Get { id } => {
            let ticket = service.get_ticket(&id).await?;
            let out = output::render_single(
                &global.output,
                &ticket,
                |t| detail(t, color),
                |t| t.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TicketsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete ticket {id}?"), "tickets delete", global.yes)? {
                eprintln!("Aborted; ticket {id} was not deleted");
                return Ok(());
            }
            service.delete_ticket(&id).await?;
            if !global.quiet {
                eprintln!("✓ Deleted ticket {id}");
            }
            Ok(())
        }

        TicketsCommand::Resolve { id, notes } => {
            let notes = notes.as_deref().map(str::trim).filter(|n| !n.is_empty());
            let ticket = service.resolve_ticket(&id, notes).await?;
            let out = output::render_single(
                &global.output,
                &ticket,
                |t| detail(t, color),
                |t| t.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
