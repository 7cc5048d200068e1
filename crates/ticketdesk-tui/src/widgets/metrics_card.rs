//! Metrics card: icon, title, big value and an optional trend line.
//!
//! Pure function of its props: no state, nothing that can fail.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Widget};

use crate::theme;

/// Rows a card needs: border, title, value, trend, border.
pub const CARD_HEIGHT: u16 = 5;

#[derive(Debug, Clone, Copy)]
pub struct MetricsCard<'a> {
    pub title: &'a str,
    pub value: &'a str,
    pub icon: &'a str,
    /// Omitted from the card entirely when `None`.
    pub trend: Option<&'a str>,
    pub color: Color,
}

impl Widget for MetricsCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.color));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            Line::from(vec![
                Span::styled(format!("{} ", self.icon), Style::default().fg(self.color)),
                Span::styled(self.title, Style::default().fg(theme::DIM_WHITE)),
            ]),
            Line::from(Span::styled(
                self.value,
                Style::default().fg(self.color).add_modifier(Modifier::BOLD),
            )),
        ];
        if let Some(trend) = self.trend {
            lines.push(Line::from(Span::styled(trend, theme::key_hint())));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn card(trend: Option<&str>) -> MetricsCard<'_> {
        MetricsCard {
            title: "Critical",
            value: "7",
            icon: "!",
            trend,
            color: theme::ERROR_RED,
        }
    }

    fn rows(buf: &Buffer) -> Vec<String> {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol())
                    .collect()
            })
            .collect()
    }

    fn draw(widget: MetricsCard<'_>) -> Buffer {
        let mut buf = Buffer::empty(Rect::new(0, 0, 24, CARD_HEIGHT));
        widget.render(buf.area, &mut buf);
        buf
    }

    #[test]
    fn renders_title_value_and_trend() {
        let buf = draw(card(Some("2 of 9 overall")));
        let rows = rows(&buf);

        assert_eq!(rows[1], "│! Critical            │");
        assert_eq!(rows[2], "│7                     │");
        assert_eq!(rows[3], "│2 of 9 overall        │");
    }

    #[test]
    fn trend_line_is_omitted_when_absent() {
        let buf = draw(card(None));
        assert_eq!(rows(&buf)[3], "│                      │");
    }

    #[test]
    fn border_takes_the_card_color() {
        let buf = draw(card(None));
        assert_eq!(buf[(0, 0)].symbol(), "╭");
        assert_eq!(buf[(0, 0)].fg, theme::ERROR_RED);
        assert_eq!(buf[(1, 2)].fg, theme::ERROR_RED);
    }
}
