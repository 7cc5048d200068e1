pub mod metrics_card;
pub mod ticket_cells;
