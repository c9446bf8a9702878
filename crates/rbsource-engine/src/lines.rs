/// The two line views of a source.
///
/// `raw` keeps each line's terminator, so concatenating it gives back the
/// source exactly. `trimmed` has exactly one trailing `\r\n`, `\n` or `\r`
/// removed from each line. Both have the same length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lines {
    raw: Vec<String>,
    trimmed: Vec<String>,
}

impl Lines {
    /// Split `source` after every `\n`. A final line without a terminator
    /// is kept; an empty source has no lines.
    pub fn materialize(source: &str) -> Self {
        let raw: Vec<String> = source.split_inclusive('\n').map(str::to_string).collect();
        let trimmed = raw.iter().map(|line| chomp(line).to_string()).collect();
        Self { raw, trimmed }
    }

    pub fn raw(&self) -> &[String] {
        &self.raw
    }

    pub fn trimmed(&self) -> &[String] {
        &self.trimmed
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// Remove one trailing line terminator.
pub fn chomp(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .or_else(|| line.strip_suffix('\r'))
        .unwrap_or(line)
}
