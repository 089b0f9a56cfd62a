//! Plain-text number formatting and keyword-line wrapping.

/// Shortest round-trip decimal form, never in exponent notation. Integral
/// values keep a decimal point (`0.0`, `1.5`, `0.00001`, `1e20` as
/// `100000000000000000000.0`).
pub fn real(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Fibre angles are written as entered: `0`, `90`, `22.5`.
pub fn angle(value: f64) -> String {
    format!("{value}")
}

/// Builds comma-separated data lines for `*Element` and `*Nset` blocks.
///
/// A new line starts once the current one would reach `max_len` characters
/// or already holds `max_entries` entries.
#[derive(Debug, Clone)]
pub struct LineWrapper {
    lines: Vec<String>,
    entries: usize,
    max_len: usize,
    max_entries: usize,
    pushed: bool,
}

impl LineWrapper {
    pub fn new(prefix: impl Into<String>, max_len: usize, max_entries: usize) -> Self {
        Self {
            lines: vec![prefix.into()],
            entries: 0,
            max_len,
            max_entries,
            pushed: false,
        }
    }

    pub fn push(&mut self, label: usize) {
        let text = label.to_string();
        self.break_if_full(text.len());
        self.current().push_str(&text);
        self.current().push(',');
        self.entries += 1;
    }

    /// Two labels kept on the same line, counted as two entries.
    pub fn push_pair(&mut self, first: usize, second: usize) {
        let a = first.to_string();
        let b = second.to_string();
        self.break_if_full(a.len() + b.len());
        let line = self.current();
        line.push_str(&a);
        line.push(',');
        line.push_str(&b);
        line.push(',');
        self.entries += 2;
    }

    /// Finished lines without the trailing comma; empty when nothing was pushed.
    pub fn finish(mut self) -> Vec<String> {
        if !self.pushed {
            return Vec::new();
        }
        if let Some(last) = self.lines.last_mut()
            && last.ends_with(',')
        {
            last.pop();
        }
        self.lines
    }

    fn break_if_full(&mut self, incoming: usize) {
        self.pushed = true;
        let current_len = self.lines.last().map_or(0, String::len);
        if current_len + incoming >= self.max_len || self.entries >= self.max_entries {
            self.lines.push(String::new());
            self.entries = 0;
        }
    }

    fn current(&mut self) -> &mut String {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        let last = self.lines.len() - 1;
        &mut self.lines[last]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reals_keep_a_decimal_point() {
        assert_eq!(real(0.0), "0.0");
        assert_eq!(real(2.0), "2.0");
        assert_eq!(real(0.125), "0.125");
        assert_eq!(real(-1.5), "-1.5");
        assert_eq!(real(1e-5), "0.00001");
        assert_eq!(real(1e16), "10000000000000000.0");
        assert!(real(1e20).ends_with("0.0"));
        assert!(!real(1e20).contains('e'));
        assert_eq!(angle(90.0), "90");
        assert_eq!(angle(-22.5), "-22.5");
    }

    #[test]
    fn wraps_on_entry_count() {
        let mut w = LineWrapper::new("1,", 70, 14);
        for label in 1..=20 {
            w.push(label);
        }
        let lines = w.finish();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "1,1,2,3,4,5,6,7,8,9,10,11,12,13,14,");
        assert_eq!(lines[1], "15,16,17,18,19,20");
    }

    #[test]
    fn wraps_on_line_length() {
        let mut w = LineWrapper::new("", 20, 14);
        for label in [100001, 100002, 100003, 100004] {
            w.push(label);
        }
        let lines = w.finish();
        assert_eq!(lines, vec!["100001,100002,", "100003,100004"]);
        assert!(lines.iter().all(|l| l.len() < 20));
    }

    #[test]
    fn pairs_stay_together() {
        let mut w = LineWrapper::new("", 70, 4);
        w.push(1);
        w.push(2);
        w.push(3);
        w.push_pair(10, 11);
        w.push_pair(12, 13);
        let lines = w.finish();
        assert_eq!(lines, vec!["1,2,3,10,11,", "12,13"]);
    }

    #[test]
    fn nothing_pushed_yields_no_lines() {
        let w = LineWrapper::new("", 70, 14);
        assert!(w.finish().is_empty());
    }
}
