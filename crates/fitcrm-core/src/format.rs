//! Presentation helpers.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate};
use quick_xml::{
  Reader,
  escape::{escape, resolve_predefined_entity, unescape_with},
  events::Event,
};

use crate::client::FitnessGoal;

/// `"2024-01-01"` (or an RFC 3339 timestamp) as `"January 1, 2024"`.
///
/// Input that is neither is returned unchanged.
pub fn format_date(input: &str) -> String {
  let input = input.trim();
  let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
    .ok()
    .or_else(|| DateTime::parse_from_rfc3339(input).ok().map(|dt| dt.date_naive()));

  match date {
    Some(d) => d.format("%B %-d, %Y").to_string(),
    None => input.to_owned(),
  }
}

/// Display label for a goal; unknown goals show their stored token.
pub fn format_goal(goal: &FitnessGoal) -> &str { goal.label() }

/// Escape text for use in HTML element content or a quoted attribute.
pub fn escape_html(text: &str) -> String { escape(text).into_owned() }

// ─── Tag stripping ───────────────────────────────────────────────────────────

const BLOCK_TAGS: &[&str] = &[
  "p", "br", "div", "li", "ul", "ol", "tr", "td", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// Reduce an HTML fragment to its plain text.
///
/// Tags are dropped, block-level tags become word breaks, entities are
/// decoded and runs of whitespace collapse to one space. Parsing stops at the
/// first piece of markup that cannot be read; text before it is kept.
pub fn strip_html(html: &str) -> String {
  let source = guard_stray_brackets(html);
  let mut reader = Reader::from_str(&source);
  let config = reader.config_mut();
  config.check_end_names = false;
  config.allow_unmatched_ends = true;

  let mut text = String::with_capacity(source.len());
  loop {
    match reader.read_event() {
      Ok(Event::Start(ref e) | Event::Empty(ref e)) => {
        if is_block_tag(e.name().as_ref()) {
          text.push(' ');
        }
      }
      Ok(Event::End(ref e)) => {
        if is_block_tag(e.name().as_ref()) {
          text.push(' ');
        }
      }
      Ok(Event::Text(ref e)) => text.push_str(&decode_entities(&String::from_utf8_lossy(e))),
      Ok(Event::CData(ref e)) => text.push_str(&String::from_utf8_lossy(e)),
      Ok(Event::Eof) => break,
      Ok(_) => {}
      Err(e) => {
        tracing::debug!(error = %e, "stopping at malformed markup");
        break;
      }
    }
  }

  text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `<` that cannot open a tag is text; escape it so the reader agrees.
fn guard_stray_brackets(html: &str) -> Cow<'_, str> {
  let opens_tag =
    |rest: &str| rest.starts_with(|c: char| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'));
  if !html.match_indices('<').any(|(i, _)| !opens_tag(&html[i + 1..])) {
    return Cow::Borrowed(html);
  }

  let mut out = String::with_capacity(html.len() + 8);
  for (i, ch) in html.char_indices() {
    if ch == '<' && !opens_tag(&html[i + 1..]) {
      out.push_str("&lt;");
    } else {
      out.push(ch);
    }
  }
  Cow::Owned(out)
}

fn is_block_tag(name: &[u8]) -> bool {
  BLOCK_TAGS.iter().any(|tag| name.eq_ignore_ascii_case(tag.as_bytes()))
}

/// Text with entities decoded, or unchanged if it holds one that is unknown.
fn decode_entities(text: &str) -> String {
  unescape_with(text, resolve_entity)
    .map(Cow::into_owned)
    .unwrap_or_else(|_| text.to_owned())
}

fn resolve_entity(name: &str) -> Option<&'static str> {
  match name {
    "nbsp" => Some(" "),
    _ => resolve_predefined_entity(name),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn formats_plain_dates() {
    assert_eq!(format_date("2024-01-01"), "January 1, 2024");
    assert_eq!(format_date("2023-12-25"), "December 25, 2023");
  }

  #[test]
  fn formats_timestamps_by_their_date() {
    assert_eq!(format_date("2024-03-09T14:30:00.000Z"), "March 9, 2024");
  }

  #[test]
  fn unparseable_dates_pass_through() {
    assert_eq!(format_date("next monday"), "next monday");
    assert_eq!(format_date(""), "");
  }

  #[test]
  fn goal_labels() {
    assert_eq!(format_goal(&FitnessGoal::MuscleGain), "Muscle Gain");
    assert_eq!(format_goal(&FitnessGoal::from("crossfit")), "crossfit");
  }

  #[test]
  fn escapes_markup_and_quotes() {
    assert_eq!(
      escape_html(r#"<img src=x onerror="alert('hi')">&"#),
      "&lt;img src=x onerror=&quot;alert(&apos;hi&apos;)&quot;&gt;&amp;"
    );
    assert_eq!(escape_html("Jane Doe"), "Jane Doe");
  }

  #[test]
  fn strips_tags_and_decodes_entities() {
    assert_eq!(
      strip_html("<p>Lie on a <strong>flat</strong> bench &amp; press.</p><p>Repeat.</p>"),
      "Lie on a flat bench & press. Repeat."
    );
  }

  #[test]
  fn stray_angle_brackets_are_text() {
    assert_eq!(strip_html("reps < 10 &lt;b&gt;"), "reps < 10 <b>");
  }

  #[test]
  fn numeric_entities() {
    assert_eq!(strip_html("caf&#233; &#x2014; ok"), "café — ok");
    assert_eq!(strip_html("AT&T; fine"), "AT&T; fine");
  }

  #[test]
  fn empty_and_tag_only_input_is_empty() {
    assert_eq!(strip_html(""), "");
    assert_eq!(strip_html("<p></p><br/>"), "");
  }

  #[test]
  fn loose_html_is_tolerated() {
    assert_eq!(strip_html("<p>one</div> two<br>three</li>"), "one two three");
    assert_eq!(strip_html("a<!-- hidden -->b&nbsp;c"), "ab c");
    assert_eq!(strip_html("<P>Upper</P><B>case</B>"), "Upper case");
  }
}
