//! Record codec
//!
//! Encoding and decoding of items to the line-oriented text format shared by
//! the snapshot and the operation log.
//!
//! ## Line Format
//! ```text
//! ITEM|<name>,<code>,<colour>,<quantity>
//! BRAND|<name>,<code>,<quantity>,<price>
//! BRAND|...
//! ```
//!
//! Text fields containing a comma, quote, or line break are wrapped in
//! quotes with inner quotes doubled. A quoted field may therefore span
//! several physical lines; [`LogicalLines`] rejoins them.

use std::borrow::Cow;

use crate::error::{Result, StoreError};

use super::{Brand, Item};

/// Prefix of an item line
pub const ITEM_PREFIX: &str = "ITEM|";

/// Prefix of a brand line
pub const BRAND_PREFIX: &str = "BRAND|";

const ITEM_FIELDS: usize = 4;
const BRAND_FIELDS: usize = 4;

// =============================================================================
// Field Escaping
// =============================================================================

/// Quote a field if it contains a delimiter
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if !field.contains(|c| matches!(c, ',' | '"' | '\n' | '\r')) {
        return Cow::Borrowed(field);
    }

    let mut escaped = String::with_capacity(field.len() + 2);
    escaped.push('"');
    for c in field.chars() {
        if c == '"' {
            escaped.push_str("\"\"");
        } else {
            escaped.push(c);
        }
    }
    escaped.push('"');
    Cow::Owned(escaped)
}

/// Split a comma-separated body into unescaped fields
pub fn split_fields(body: &str) -> Result<Vec<String>> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
            continue;
        }

        match c {
            '"' if at_field_start => {
                in_quotes = true;
                at_field_start = false;
            }
            ',' => {
                fields.push(std::mem::take(&mut current));
                at_field_start = true;
            }
            _ => {
                current.push(c);
                at_field_start = false;
            }
        }
    }

    if in_quotes {
        return Err(StoreError::Codec(format!("unterminated quoted field in {:?}", body)));
    }

    fields.push(current);
    Ok(fields)
}

// =============================================================================
// Encoding
// =============================================================================

/// Encode the item line (without brands or trailing newline)
pub fn encode_item_line(item: &Item) -> String {
    format!(
        "{}{},{},{},{}",
        ITEM_PREFIX,
        escape_field(&item.name),
        item.code,
        escape_field(&item.colour),
        item.quantity
    )
}

/// Encode a brand line (without trailing newline)
pub fn encode_brand_line(brand: &Brand) -> String {
    format!(
        "{}{},{},{},{}",
        BRAND_PREFIX,
        escape_field(&brand.name),
        brand.code,
        brand.quantity,
        brand.price
    )
}

/// Encode an item followed by its brands, one newline-terminated line each
pub fn encode_item(item: &Item) -> String {
    let mut out = encode_item_line(item);
    out.push('\n');
    for brand in &item.brands {
        out.push_str(&encode_brand_line(brand));
        out.push('\n');
    }
    out
}

/// Encode a full record set: each item block followed by a blank separator
pub fn encode_items<'a>(items: impl IntoIterator<Item = &'a Item>) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(&encode_item(item));
        out.push('\n');
    }
    out
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode an item line; the returned item has no brands yet
pub fn decode_item_line(line: &str) -> Result<Item> {
    let body = line
        .strip_prefix(ITEM_PREFIX)
        .ok_or_else(|| StoreError::Codec(format!("not an item line: {:?}", line)))?;

    let fields = split_fields(body)?;
    if fields.len() != ITEM_FIELDS {
        return Err(StoreError::Codec(format!(
            "item line: expected {} fields, got {} in {:?}",
            ITEM_FIELDS,
            fields.len(),
            line
        )));
    }

    let mut fields = fields.into_iter();
    let name = next_field(&mut fields);
    let code = parse_number(&next_field(&mut fields), "item code", line)?;
    let colour = next_field(&mut fields);
    let quantity = parse_number(&next_field(&mut fields), "item quantity", line)?;

    Ok(Item {
        name,
        code,
        colour,
        quantity,
        brands: Vec::new(),
    })
}

/// Decode a brand line
pub fn decode_brand_line(line: &str) -> Result<Brand> {
    let body = line
        .strip_prefix(BRAND_PREFIX)
        .ok_or_else(|| StoreError::Codec(format!("not a brand line: {:?}", line)))?;

    let fields = split_fields(body)?;
    if fields.len() != BRAND_FIELDS {
        return Err(StoreError::Codec(format!(
            "brand line: expected {} fields, got {} in {:?}",
            BRAND_FIELDS,
            fields.len(),
            line
        )));
    }

    let mut fields = fields.into_iter();
    let name = next_field(&mut fields);
    let code = parse_number(&next_field(&mut fields), "brand code", line)?;
    let quantity = parse_number(&next_field(&mut fields), "brand quantity", line)?;
    let price = parse_number(&next_field(&mut fields), "brand price", line)?;

    Ok(Brand {
        name,
        code,
        quantity,
        price,
    })
}

/// Decode a full record set as written by [`encode_items`]
///
/// Blank lines are separators. A brand line before any item line, or a line
/// with an unknown prefix, is reported as corruption.
pub fn decode_items(text: &str) -> Result<Vec<Item>> {
    let mut items = Vec::new();
    let mut current: Option<Item> = None;

    for line in LogicalLines::new(text) {
        if line.trim().is_empty() {
            continue;
        }

        if line.starts_with(ITEM_PREFIX) {
            if let Some(done) = current.take() {
                items.push(done);
            }
            current = Some(decode_item_line(&line)?);
        } else if line.starts_with(BRAND_PREFIX) {
            let brand = decode_brand_line(&line)?;
            match current.as_mut() {
                Some(item) => item.brands.push(brand),
                None => {
                    return Err(StoreError::SnapshotCorruption(format!(
                        "brand line without an owning item: {:?}",
                        line
                    )))
                }
            }
        } else {
            return Err(StoreError::SnapshotCorruption(format!(
                "unrecognised line: {:?}",
                line
            )));
        }
    }

    if let Some(done) = current {
        items.push(done);
    }

    Ok(items)
}

fn next_field(fields: &mut impl Iterator<Item = String>) -> String {
    // Field counts are checked before this is called.
    fields.next().unwrap_or_default()
}

fn parse_number<T: std::str::FromStr>(raw: &str, what: &str, line: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| StoreError::Codec(format!("invalid {} {:?} in {:?}", what, raw, line)))
}

// =============================================================================
// Logical Lines
// =============================================================================

/// Iterator over logical lines: physical lines rejoined while a quoted field
/// is still open
///
/// Line breaks inside a quoted field are kept byte for byte (`\r\n`
/// included); only the terminator of the logical line is stripped.
pub struct LogicalLines<'a> {
    lines: std::str::SplitInclusive<'a, char>,
}

impl<'a> LogicalLines<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.split_inclusive('\n'),
        }
    }
}

impl Iterator for LogicalLines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.lines.next()?;
        let mut line = first.to_string();

        // Doubled quotes keep the count even, so odd means a field is open.
        let mut quotes = first.matches('"').count();
        while quotes % 2 == 1 {
            match self.lines.next() {
                Some(more) => {
                    line.push_str(more);
                    quotes += more.matches('"').count();
                }
                None => break,
            }
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }

        Some(line)
    }
}
