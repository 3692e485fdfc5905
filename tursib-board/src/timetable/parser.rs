//! Timetable page extraction.
//!
//! The station page renders one `div.program` block per weekly program,
//! each headed by an `h4`. Inside, every `div.card-body` is a route card:
//!
//! ```html
//! <div class="card-body">
//!   <a class="traseu-link">11</a>
//!   <span class="headsign-info">Spre stația Gara, Cimitir</span>
//!   <span class="h p0">06:15</span>
//!   <span class="h p1">06:40</span>
//! </div>
//! ```
//!
//! A single card often multiplexes two directions. The `pN` class on a time
//! token picks the N-th comma-separated destination from the headsign.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};

use crate::domain::{ClockTime, ProgramKey, RawDeparture, UNKNOWN_FIELD};

use super::table::{ParseOutcome, ProgramTable};

/// Leading phrase on headsign labels ("towards stop").
const TOWARDS_PREFIXES: [&str; 2] = ["Spre stația", "Spre statia"];

static SECTION: LazyLock<Selector> = LazyLock::new(|| selector("div.program"));
static HEADING: LazyLock<Selector> = LazyLock::new(|| selector("h4"));
static CARD: LazyLock<Selector> = LazyLock::new(|| selector("div.card-body"));
static LINE: LazyLock<Selector> = LazyLock::new(|| selector("a.traseu-link"));
static HEADSIGN: LazyLock<Selector> = LazyLock::new(|| selector("span.headsign-info"));
static TIME: LazyLock<Selector> = LazyLock::new(|| selector("span.h"));

fn selector(css: &'static str) -> Selector {
    // Only ever called with the literals above
    Selector::parse(css).expect("selector literal is valid CSS")
}

/// Parse a timetable page into departures grouped by program.
///
/// Sections with an unrecognised heading are skipped, as are time tokens
/// that are not valid "HH:MM" times. If nothing survives, the result is
/// [`ParseOutcome::NoData`].
pub fn parse(html: &str) -> ParseOutcome {
    let document = Html::parse_document(html);
    let mut table = ProgramTable::new();

    for section in document.select(&SECTION) {
        let Some(heading) = section.select(&HEADING).next() else {
            continue;
        };

        let heading = element_text(heading);
        let Some(key) = ProgramKey::classify_heading(&heading) else {
            trace!(%heading, "skipping unclassified section");
            continue;
        };

        for card in section.select(&CARD) {
            for departure in parse_card(card) {
                table.push(key, departure);
            }
        }
    }

    debug!(
        weekday = table.get(ProgramKey::Weekday).len(),
        saturday = table.get(ProgramKey::Saturday).len(),
        sunday = table.get(ProgramKey::Sunday).len(),
        "parsed timetable"
    );

    ParseOutcome::from_table(table)
}

/// Extract every departure from one route card.
fn parse_card(card: ElementRef<'_>) -> Vec<RawDeparture> {
    let line = card
        .select(&LINE)
        .next()
        .map(element_text)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN_FIELD.to_string());

    let destinations = card
        .select(&HEADSIGN)
        .next()
        .map(|el| Destinations::from_label(&element_text(el)));

    card.select(&TIME)
        .filter_map(|token| {
            let text = element_text(token);
            let time = ClockTime::parse_hhmm(&text).ok()?;

            let destination = match &destinations {
                Some(d) => d.resolve(marker_index(token)),
                None => UNKNOWN_FIELD,
            };

            Some(RawDeparture::new(line.clone(), destination, time))
        })
        .collect()
}

/// Candidate destinations from a headsign label.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Destinations {
    /// Label text with the "towards" prefix removed.
    raw: String,
    candidates: Vec<String>,
}

impl Destinations {
    fn from_label(label: &str) -> Self {
        let label = label.trim();
        let stripped = TOWARDS_PREFIXES
            .iter()
            .find_map(|p| label.strip_prefix(p))
            .unwrap_or(label)
            .trim();

        let candidates = stripped
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            raw: stripped.to_string(),
            candidates,
        }
    }

    /// Pick the destination for a marker index.
    ///
    /// Out-of-range or missing indices fall back to the first candidate,
    /// then to the raw label, then to the unknown placeholder.
    fn resolve(&self, index: Option<usize>) -> &str {
        index
            .and_then(|i| self.candidates.get(i))
            .or_else(|| self.candidates.first())
            .map(String::as_str)
            .unwrap_or(if self.raw.is_empty() {
                UNKNOWN_FIELD
            } else {
                self.raw.as_str()
            })
    }
}

/// Index encoded in the first `p…` class of a time token.
///
/// Only the first class starting with `p` (and longer than `p` itself) is
/// considered; if its suffix is not a number there is no index.
fn marker_index(token: ElementRef<'_>) -> Option<usize> {
    let suffix = token
        .value()
        .classes()
        .find_map(|class| class.strip_prefix('p').filter(|rest| !rest.is_empty()))?;
    if !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// Element text with whitespace runs collapsed and ends trimmed.
fn element_text(el: ElementRef<'_>) -> String {
    let text: String = el.text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(sections: &str) -> String {
        format!("<html><body><div class=\"container\">{sections}</div></body></html>")
    }

    fn section(heading: &str, cards: &str) -> String {
        format!("<div class=\"program\"><h4>{heading}</h4>{cards}</div>")
    }

    fn card(line: Option<&str>, headsign: Option<&str>, tokens: &[(&str, &str)]) -> String {
        let mut html = String::from("<div class=\"card\"><div class=\"card-body\">");
        if let Some(line) = line {
            html.push_str(&format!("<a class=\"traseu-link\" href=\"/t/{line}\">{line}</a>"));
        }
        if let Some(headsign) = headsign {
            html.push_str(&format!("<span class=\"headsign-info\">{headsign}</span>"));
        }
        for (classes, text) in tokens {
            html.push_str(&format!("<span class=\"{classes}\">{text}</span>"));
        }
        html.push_str("</div></div>");
        html
    }

    fn times(departures: &[RawDeparture]) -> Vec<String> {
        departures
            .iter()
            .map(|d| d.departure_time.to_string())
            .collect()
    }

    fn found(html: &str) -> ProgramTable {
        match parse(html) {
            ParseOutcome::Found(table) => table,
            ParseOutcome::NoData => panic!("expected timetable data"),
        }
    }

    #[test]
    fn parses_all_three_programs() {
        let html = page(&[
            section(
                "Luni - Vineri",
                &card(Some("11"), Some("Spre stația Gara"), &[("h", "06:00"), ("h", "07:30")]),
            ),
            section(
                "Sâmbătă",
                &card(Some("11"), Some("Spre stația Gara"), &[("h", "08:00")]),
            ),
            section(
                "Duminică",
                &card(Some("11"), Some("Spre stația Gara"), &[("h", "09:00")]),
            ),
        ]
        .concat());

        let table = found(&html);
        assert_eq!(times(table.get(ProgramKey::Weekday)), vec!["06:00", "07:30"]);
        assert_eq!(times(table.get(ProgramKey::Saturday)), vec!["08:00"]);
        assert_eq!(times(table.get(ProgramKey::Sunday)), vec!["09:00"]);

        let first = &table.get(ProgramKey::Weekday)[0];
        assert_eq!(first.line, "11");
        assert_eq!(first.destination, "Gara");
    }

    #[test]
    fn keeps_document_order_across_cards() {
        let cards = [
            card(Some("5"), Some("Spre stația A"), &[("h", "12:00")]),
            card(Some("11"), Some("Spre stația B"), &[("h", "06:00")]),
        ]
        .concat();
        let table = found(&page(&section("Luni-Vineri", &cards)));

        let lines: Vec<_> = table
            .get(ProgramKey::Weekday)
            .iter()
            .map(|d| d.line.as_str())
            .collect();
        assert_eq!(lines, vec!["5", "11"]);
    }

    #[test]
    fn unclassified_sections_are_ignored() {
        let html = page(&[
            section("Informații", &card(Some("1"), Some("X"), &[("h", "10:00")])),
            section("Luni", &card(Some("2"), Some("Y"), &[("h", "11:00")])),
        ]
        .concat());

        let table = found(&html);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(ProgramKey::Weekday)[0].line, "2");
    }

    #[test]
    fn only_unclassified_sections_is_no_data() {
        let html = page(&section(
            "Anunțuri",
            &card(Some("1"), Some("X"), &[("h", "10:00")]),
        ));
        assert_eq!(parse(&html), ParseOutcome::NoData);
    }

    #[test]
    fn section_without_heading_is_ignored() {
        let html = page(&format!(
            "<div class=\"program\">{}</div>",
            card(Some("1"), Some("X"), &[("h", "10:00")])
        ));
        assert_eq!(parse(&html), ParseOutcome::NoData);
    }

    #[test]
    fn no_valid_tokens_is_no_data() {
        let html = page(&section(
            "Luni - Vineri",
            &card(
                Some("11"),
                Some("Spre stația Gara"),
                &[("h", "--:--"), ("h", "Ora"), ("h", "24:00")],
            ),
        ));
        assert_eq!(parse(&html), ParseOutcome::NoData);
    }

    #[test]
    fn empty_document_is_no_data() {
        assert_eq!(parse(""), ParseOutcome::NoData);
        assert_eq!(parse("<html><body></body></html>"), ParseOutcome::NoData);
        assert_eq!(parse("not html at all"), ParseOutcome::NoData);
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let html = page(&section(
            "Luni",
            &card(
                Some("11"),
                Some("Gara"),
                &[
                    ("h", "24:00"),
                    ("h", "ab:cd"),
                    ("h", "8:00"),
                    ("h", "08:000"),
                    ("h", "12:15"),
                ],
            ),
        ));
        let table = found(&html);
        assert_eq!(times(table.get(ProgramKey::Weekday)), vec!["12:15"]);
    }

    #[test]
    fn token_whitespace_is_trimmed() {
        let html = page(&section(
            "Luni",
            &card(Some(" 11 "), Some("Gara"), &[("h", "\n  07:05\n ")]),
        ));
        let table = found(&html);
        let dep = &table.get(ProgramKey::Weekday)[0];
        assert_eq!(dep.line, "11");
        assert_eq!(dep.departure_time.to_string(), "07:05");
    }

    #[test]
    fn spans_without_time_class_are_ignored() {
        let html = page(&section(
            "Luni",
            &card(Some("11"), Some("Gara"), &[("m", "07:05"), ("h", "07:10")]),
        ));
        let table = found(&html);
        assert_eq!(times(table.get(ProgramKey::Weekday)), vec!["07:10"]);
    }

    #[test]
    fn marker_selects_destination() {
        let html = page(&section(
            "Luni",
            &card(
                Some("11"),
                Some("Spre stația Gara, Cimitir"),
                &[("h p0", "06:00"), ("h p1", "06:10"), ("h", "06:20")],
            ),
        ));
        let table = found(&html);
        let dests: Vec<_> = table
            .get(ProgramKey::Weekday)
            .iter()
            .map(|d| d.destination.as_str())
            .collect();
        assert_eq!(dests, vec!["Gara", "Cimitir", "Gara"]);
    }

    #[test]
    fn marker_class_order_does_not_matter() {
        let html = page(&section(
            "Luni",
            &card(Some("11"), Some("Gara, Cimitir"), &[("p1 h", "06:00")]),
        ));
        let table = found(&html);
        assert_eq!(table.get(ProgramKey::Weekday)[0].destination, "Cimitir");
    }

    #[test]
    fn out_of_range_marker_falls_back_to_first() {
        let html = page(&section(
            "Luni",
            &card(Some("11"), Some("Spre stația Gara, Cimitir"), &[("h p5", "06:00")]),
        ));
        let table = found(&html);
        assert_eq!(table.get(ProgramKey::Weekday)[0].destination, "Gara");
    }

    #[test]
    fn malformed_marker_falls_back_to_first() {
        let html = page(&section(
            "Luni",
            &card(
                Some("11"),
                Some("Gara, Cimitir"),
                &[("h px", "06:00"), ("h p", "06:05"), ("h p-1", "06:10")],
            ),
        ));
        let table = found(&html);
        assert!(
            table
                .get(ProgramKey::Weekday)
                .iter()
                .all(|d| d.destination == "Gara")
        );
    }

    #[test]
    fn first_p_class_decides_marker() {
        let html = page(&section(
            "Luni",
            &card(
                Some("11"),
                Some("Spre stația Gara, Cimitir"),
                &[("h pull-right p1", "06:00"), ("h px p1", "06:10")],
            ),
        ));
        let table = found(&html);
        let destinations: Vec<_> = table
            .get(ProgramKey::Weekday)
            .iter()
            .map(|d| d.destination.as_str())
            .collect();
        assert_eq!(destinations, ["Gara", "Gara"]);
    }

    #[test]
    fn lone_p_class_is_skipped() {
        let html = page(&section(
            "Luni",
            &card(Some("11"), Some("Gara, Cimitir"), &[("h p p1", "06:00")]),
        ));
        let table = found(&html);
        assert_eq!(table.get(ProgramKey::Weekday)[0].destination, "Cimitir");
    }

    #[test]
    fn missing_line_and_headsign_use_placeholder() {
        let html = page(&section("Luni", &card(None, None, &[("h p1", "06:00")])));
        let table = found(&html);
        let dep = &table.get(ProgramKey::Weekday)[0];
        assert_eq!(dep.line, "?");
        assert_eq!(dep.destination, "?");
    }

    #[test]
    fn destination_candidates_are_trimmed() {
        let d = Destinations::from_label("Spre stația  Gara ,, Cimitir , ");
        assert_eq!(d.candidates, vec!["Gara", "Cimitir"]);
        assert_eq!(d.raw, "Gara ,, Cimitir ,");
    }

    #[test]
    fn destination_without_prefix() {
        let d = Destinations::from_label("Gara");
        assert_eq!(d.candidates, vec!["Gara"]);
    }

    #[test]
    fn destination_prefix_without_diacritics() {
        let d = Destinations::from_label("Spre statia Gara");
        assert_eq!(d.candidates, vec!["Gara"]);
    }

    #[test]
    fn resolve_falls_back_to_raw_text() {
        let d = Destinations::from_label(",");
        assert!(d.candidates.is_empty());
        assert_eq!(d.resolve(Some(0)), ",");

        let d = Destinations::from_label("Spre stația");
        assert_eq!(d.resolve(None), "?");
    }

    #[test]
    fn resolve_in_and_out_of_range() {
        let d = Destinations::from_label("A, B");
        assert_eq!(d.resolve(Some(0)), "A");
        assert_eq!(d.resolve(Some(1)), "B");
        assert_eq!(d.resolve(Some(2)), "A");
        assert_eq!(d.resolve(None), "A");
    }

    #[test]
    fn huge_marker_index_does_not_panic() {
        let html = page(&section(
            "Luni",
            &card(
                Some("11"),
                Some("A, B"),
                &[("h p99999999999999999999999", "06:00")],
            ),
        ));
        let table = found(&html);
        assert_eq!(table.get(ProgramKey::Weekday)[0].destination, "A");
    }

    #[test]
    fn nested_markup_in_headsign() {
        let html = page(&section(
            "Luni",
            &card(
                Some("11"),
                Some("Spre stația <b>Gara</b>,\n <i>Cimitir</i>"),
                &[("h p1", "06:00")],
            ),
        ));
        let table = found(&html);
        assert_eq!(table.get(ProgramKey::Weekday)[0].destination, "Cimitir");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn single_card_page(classes: &str, token: &str, headsign: &str) -> String {
        format!(
            "<div class=\"program\"><h4>Luni - Vineri</h4><div class=\"card-body\">\
             <a class=\"traseu-link\">11</a>\
             <span class=\"headsign-info\">{headsign}</span>\
             <span class=\"{classes}\">{token}</span></div></div>"
        )
    }

    proptest! {
        /// A valid time token always yields data under its program
        #[test]
        fn valid_token_is_found(hour in 0u32..24, minute in 0u32..60) {
            let token = format!("{hour:02}:{minute:02}");
            let outcome = parse(&single_card_page("h", &token, "Gara"));
            let table = outcome.table().cloned().unwrap_or_default();
            prop_assert_eq!(table.get(ProgramKey::Weekday).len(), 1);
            prop_assert_eq!(table.get(ProgramKey::Weekday)[0].departure_time.to_string(), token);
        }

        /// Tokens of the wrong length never produce departures
        #[test]
        fn wrong_length_token_is_no_data(token in "[0-9]{1,2}:[0-9]{3,4}|[0-9]:[0-9]{2}") {
            let outcome = parse(&single_card_page("h", &token, "Gara"));
            prop_assert!(outcome.is_no_data());
        }

        /// Any marker index resolves to one of the candidates
        #[test]
        fn marker_always_resolves_to_candidate(idx in 0usize..50, n in 1usize..5) {
            let names: Vec<String> = (0..n).map(|i| format!("Dest{i}")).collect();
            let headsign = format!("Spre stația {}", names.join(", "));
            let classes = format!("h p{idx}");
            let outcome = parse(&single_card_page(&classes, "10:00", &headsign));
            let table = outcome.table().cloned().unwrap_or_default();
            let dest = &table.get(ProgramKey::Weekday)[0].destination;

            let expected = if idx < n { &names[idx] } else { &names[0] };
            prop_assert_eq!(dest, expected);
        }
    }
}
