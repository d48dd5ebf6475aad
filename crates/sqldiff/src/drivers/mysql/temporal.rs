//! MySQL temporal values rendered as the server renders them.
//!
//! chrono cannot hold zero dates (`0000-00-00`) or TIME values outside one
//! day (`-01:00:00`, `838:59:59`), so temporal columns are read as raw value
//! bytes and turned into text here. Text-protocol values are already text;
//! binary-protocol values are a length byte followed by packed fields.

/// Which temporal column type a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TemporalKind {
    Date,
    DateTime,
    Time,
}

impl TemporalKind {
    fn zero(self) -> &'static str {
        match self {
            TemporalKind::Date => "0000-00-00",
            TemporalKind::DateTime => "0000-00-00 00:00:00",
            TemporalKind::Time => "00:00:00",
        }
    }
}

/// Render one non-NULL temporal value.
pub(crate) fn temporal_text(kind: TemporalKind, raw: &[u8]) -> Result<String, String> {
    let Some((&len, body)) = raw.split_first() else {
        return Ok(kind.zero().to_string());
    };
    // Text protocol: digits or a leading minus sign
    if len.is_ascii_digit() || len == b'-' {
        return Ok(String::from_utf8_lossy(raw).into_owned());
    }

    let len = usize::from(len);
    if body.len() < len {
        return Err(format!(
            "truncated {:?} value: {} of {} bytes",
            kind,
            body.len(),
            len
        ));
    }
    let body = &body[..len];
    if len == 0 {
        return Ok(kind.zero().to_string());
    }

    match kind {
        TemporalKind::Date | TemporalKind::DateTime => date_time(kind, body),
        TemporalKind::Time => time(body),
    }
}

fn date_time(kind: TemporalKind, body: &[u8]) -> Result<String, String> {
    if !matches!(body.len(), 4 | 7 | 11) {
        return Err(format!("bad {:?} length {}", kind, body.len()));
    }
    let year = u16::from_le_bytes([body[0], body[1]]);
    let date = format!("{:04}-{:02}-{:02}", year, body[2], body[3]);
    if kind == TemporalKind::Date {
        return Ok(date);
    }

    let (hour, minute, second) = match body.len() {
        4 => (0, 0, 0),
        _ => (body[4], body[5], body[6]),
    };
    let micros = match body.len() {
        11 => u32::from_le_bytes([body[7], body[8], body[9], body[10]]),
        _ => 0,
    };
    Ok(format!(
        "{} {:02}:{:02}:{:02}{}",
        date,
        hour,
        minute,
        second,
        fraction(micros)
    ))
}

fn time(body: &[u8]) -> Result<String, String> {
    if !matches!(body.len(), 8 | 12) {
        return Err(format!("bad Time length {}", body.len()));
    }
    let negative = body[0] == 1;
    let days = u32::from_le_bytes([body[1], body[2], body[3], body[4]]);
    let hours = u64::from(days) * 24 + u64::from(body[5]);
    let micros = match body.len() {
        12 => u32::from_le_bytes([body[8], body[9], body[10], body[11]]),
        _ => 0,
    };
    Ok(format!(
        "{}{:02}:{:02}:{:02}{}",
        if negative { "-" } else { "" },
        hours,
        body[6],
        body[7],
        fraction(micros)
    ))
}

fn fraction(micros: u32) -> String {
    if micros == 0 {
        String::new()
    } else {
        format!(".{:06}", micros)
    }
}
