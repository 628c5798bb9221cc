//! CMap program parser.
//!
//! Reads the PostScript-flavored text of a CID CMap resource (the files in
//! Adobe's `cmap-resources`, or an embedded CMap stream) and extracts what
//! the maps need:
//!
//! - `/CMapName`, `/WMode`, and `/CIDSystemInfo` (Registry, Ordering, Supplement)
//! - `begincodespacerange`/`endcodespacerange`
//! - `begincidchar`/`endcidchar` (`<code> cid`)
//! - `begincidrange`/`endcidrange` (`<low> <high> cid`)
//! - `/Parent usecmap`
//!
//! Mappings are kept in the order the program declares them, across all
//! sections, since that order decides which CID wins a code collision.
//! Nothing here checks that the program is a legal CMap beyond what is needed
//! to read it.

use std::borrow::Cow;

use cidmap_core::{ByteCode, CidCodeTable, CidSystemInfo, CidUnicodeTable, WritingMode};

use crate::error::LoaderError;
use crate::options::LoaderOptions;

/// A `begincodespacerange` entry. Codes are in range when every byte lies
/// between the corresponding bytes of `low` and `high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodespaceRange {
    /// Lowest code.
    pub low: ByteCode,
    /// Highest code.
    pub high: ByteCode,
}

impl CodespaceRange {
    /// Whether `code` lies in this range.
    pub fn contains(&self, code: &ByteCode) -> bool {
        code.len() == self.low.len()
            && self
                .low
                .as_bytes()
                .iter()
                .zip(code.as_bytes())
                .zip(self.high.as_bytes())
                .all(|((lo, b), hi)| lo <= b && b <= hi)
    }
}

/// How the source codes of a Unicode CMap encode Unicode text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnicodeForm {
    /// `Uni*-UCS2-*` and `Uni*-UTF16-*`: UTF-16BE code units.
    Utf16,
    /// `Uni*-UTF32-*`: one UTF-32BE scalar per code.
    Utf32,
    /// `Uni*-UTF8-*`: UTF-8 bytes.
    Utf8,
}

impl UnicodeForm {
    /// Pick the form from a Unicode CMap name. UTF-16 unless the name says
    /// otherwise.
    pub fn for_cmap_name(name: &str) -> Self {
        if name.contains("UTF32") {
            UnicodeForm::Utf32
        } else if name.contains("UTF8") {
            UnicodeForm::Utf8
        } else {
            UnicodeForm::Utf16
        }
    }

    /// Decode one source code. `None` if the bytes are not valid text in
    /// this form (e.g., a lone surrogate).
    pub fn decode(self, code: &ByteCode) -> Option<String> {
        match self {
            UnicodeForm::Utf16 => encoding_rs::UTF_16BE
                .decode_without_bom_handling_and_without_replacement(code.as_bytes())
                .map(Cow::into_owned),
            UnicodeForm::Utf8 => encoding_rs::UTF_8
                .decode_without_bom_handling_and_without_replacement(code.as_bytes())
                .map(Cow::into_owned),
            UnicodeForm::Utf32 => char::from_u32(code.to_code()).map(String::from),
        }
    }
}

/// A parsed CID CMap program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CMapProgram {
    name: Option<String>,
    system_info: Option<CidSystemInfo>,
    writing_mode: WritingMode,
    use_cmap: Option<String>,
    codespace: Vec<CodespaceRange>,
    mappings: Vec<(ByteCode, u32)>,
}

impl CMapProgram {
    /// Parse a CMap program with default [`LoaderOptions`].
    pub fn parse(data: &[u8]) -> Result<Self, LoaderError> {
        Self::parse_with_options(data, &LoaderOptions::default())
    }

    /// Parse a CMap program.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Parse`] for unterminated sections, bad hex
    /// codes, missing CIDs, CID overflow, or an incomplete `/CIDSystemInfo`,
    /// and [`LoaderError::LimitExceeded`] for a `cidrange` longer than
    /// `options.max_range_len` or more than `options.max_mappings` mappings.
    pub fn parse_with_options(data: &[u8], options: &LoaderOptions) -> Result<Self, LoaderError> {
        let text = String::from_utf8_lossy(data);
        let mut program = CMapProgram {
            name: parse_cmap_name(&text),
            system_info: parse_system_info(&text)?,
            writing_mode: WritingMode::from_wmode(parse_writing_mode(&text)),
            use_cmap: parse_use_cmap(&text),
            ..CMapProgram::default()
        };

        let mut search_from = 0;
        while let Some((section, body, next)) = next_section(&text, search_from)? {
            match section {
                Section::Codespace => parse_codespace_section(body, &mut program.codespace)?,
                Section::CidChar => parse_cidchar_section(body, options, &mut program.mappings)?,
                Section::CidRange => parse_cidrange_section(body, options, &mut program.mappings)?,
            }
            search_from = next;
        }

        Ok(program)
    }

    /// `/CMapName` declared by the program.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// `/CIDSystemInfo` declared by the program (or inherited via `usecmap`).
    pub fn system_info(&self) -> Option<&CidSystemInfo> {
        self.system_info.as_ref()
    }

    /// Writing mode from `/WMode`.
    pub fn writing_mode(&self) -> WritingMode {
        self.writing_mode
    }

    /// Parent CMap named by `usecmap`, if not yet merged.
    pub fn use_cmap(&self) -> Option<&str> {
        self.use_cmap.as_deref()
    }

    /// Codespace ranges.
    pub fn codespace(&self) -> &[CodespaceRange] {
        &self.codespace
    }

    /// Whether `code` falls in one of the codespace ranges.
    pub fn in_codespace(&self, code: &ByteCode) -> bool {
        self.codespace.iter().any(|range| range.contains(code))
    }

    /// `(code, cid)` mappings in declaration order.
    pub fn mappings(&self) -> &[(ByteCode, u32)] {
        &self.mappings
    }

    /// Number of code → CID mappings.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Returns true if the program maps no codes.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Merge the parent named by `usecmap`.
    ///
    /// The parent's mappings come first so the child's own declarations are
    /// later in order and win. Collection info and codespace are inherited
    /// only when the child has none.
    pub fn inherit(&mut self, parent: CMapProgram) {
        let mut mappings = parent.mappings;
        mappings.append(&mut self.mappings);
        self.mappings = mappings;
        if self.system_info.is_none() {
            self.system_info = parent.system_info;
        }
        if self.codespace.is_empty() {
            self.codespace = parent.codespace;
        }
        self.use_cmap = None;
    }

    /// Invert the program into a CID → code table.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Parse`] if the program has no
    /// `/CIDSystemInfo`.
    pub fn into_code_table(self) -> Result<CidCodeTable, LoaderError> {
        let system_info = self
            .system_info
            .ok_or_else(|| LoaderError::Parse("missing /CIDSystemInfo".to_string()))?;
        let mut table = CidCodeTable::new(system_info).with_writing_mode(self.writing_mode);
        table.name = self.name;
        table.entries.reserve(self.mappings.len());
        for (code, cid) in self.mappings {
            table.push(cid, code);
        }
        Ok(table)
    }

    /// Invert a Unicode CMap program into a CID → Unicode table.
    ///
    /// Source codes that are not valid text in `form` are skipped.
    pub fn into_unicode_table(self, form: UnicodeForm) -> CidUnicodeTable {
        let mut table = CidUnicodeTable::new();
        table.name = self.name;
        table.entries.reserve(self.mappings.len());
        for (code, cid) in self.mappings {
            match form.decode(&code) {
                Some(text) => table.push(cid, text),
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(%code, cid, "skipping source code that is not valid Unicode");
                }
            }
        }
        table
    }
}

/// Load a program and every parent it names through `usecmap`.
///
/// `fetch` returns the raw bytes of a named resource. Chains deeper than
/// `options.max_usecmap_depth` (including cycles) fail with
/// [`LoaderError::LimitExceeded`].
pub fn load_program_chain<F>(
    name: &str,
    options: &LoaderOptions,
    fetch: F,
) -> Result<CMapProgram, LoaderError>
where
    F: Fn(&str) -> Result<Vec<u8>, LoaderError>,
{
    load_program_at_depth(name, options, &fetch, 0)
}

fn load_program_at_depth<F>(
    name: &str,
    options: &LoaderOptions,
    fetch: &F,
    depth: usize,
) -> Result<CMapProgram, LoaderError>
where
    F: Fn(&str) -> Result<Vec<u8>, LoaderError>,
{
    if depth > options.max_usecmap_depth {
        return Err(LoaderError::LimitExceeded {
            limit_name: "max_usecmap_depth",
            limit_value: options.max_usecmap_depth,
            actual_value: depth,
        });
    }
    let data = fetch(name)?;
    let mut program =
        CMapProgram::parse_with_options(&data, options).map_err(|e| e.in_resource(name))?;
    if let Some(parent_name) = program.use_cmap().map(str::to_string) {
        let parent = load_program_at_depth(&parent_name, options, fetch, depth + 1)?;
        check_mapping_limit(&program.mappings, parent.len() as u64, options.max_mappings)?;
        program.inherit(parent);
    }
    Ok(program)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Codespace,
    CidChar,
    CidRange,
}

impl Section {
    const ALL: [Section; 3] = [Section::Codespace, Section::CidChar, Section::CidRange];

    fn begin(self) -> &'static str {
        match self {
            Section::Codespace => "begincodespacerange",
            Section::CidChar => "begincidchar",
            Section::CidRange => "begincidrange",
        }
    }

    fn end(self) -> &'static str {
        match self {
            Section::Codespace => "endcodespacerange",
            Section::CidChar => "endcidchar",
            Section::CidRange => "endcidrange",
        }
    }
}

/// Find the next section starting at or after `from`.
///
/// Returns the section kind, its body, and the offset just past its end
/// keyword. Each `begin` in the text is looked at once.
fn next_section(text: &str, from: usize) -> Result<Option<(Section, &str, usize)>, LoaderError> {
    let mut cursor = from;
    while let Some(pos) = text[cursor..].find("begin") {
        let start = cursor + pos;
        let Some(section) = Section::ALL
            .into_iter()
            .find(|section| text[start..].starts_with(section.begin()))
        else {
            cursor = start + "begin".len();
            continue;
        };

        let body_start = start + section.begin().len();
        let body_len = text[body_start..]
            .find(section.end())
            .ok_or_else(|| LoaderError::Parse(format!("unterminated {}", section.begin())))?;
        let body = &text[body_start..body_start + body_len];
        return Ok(Some((section, body, body_start + body_len + section.end().len())));
    }
    Ok(None)
}

/// A token inside a section body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    /// Contents of a `<...>` hex string.
    Hex(&'a str),
    /// Any other whitespace-delimited word, expected to be a CID.
    Word(&'a str),
}

/// Split a section body into tokens, ignoring line breaks and `%` comments.
fn tokenize(body: &str) -> Result<Vec<Token<'_>>, LoaderError> {
    let mut tokens = Vec::new();
    let mut rest = body;
    loop {
        rest = rest.trim_start();
        let Some(first) = rest.chars().next() else {
            break;
        };
        match first {
            '<' => {
                let end = rest
                    .find('>')
                    .ok_or_else(|| LoaderError::Parse(format!("unterminated hex string '{rest}'")))?;
                tokens.push(Token::Hex(&rest[1..end]));
                rest = &rest[end + 1..];
            }
            '%' => {
                rest = rest.find('\n').map(|pos| &rest[pos..]).unwrap_or("");
            }
            _ => {
                let end = rest
                    .find(|c: char| c.is_whitespace() || c == '<' || c == '%')
                    .unwrap_or(rest.len());
                tokens.push(Token::Word(&rest[..end]));
                rest = &rest[end..];
            }
        }
    }
    Ok(tokens)
}

fn expect_hex(token: Token<'_>) -> Result<ByteCode, LoaderError> {
    match token {
        Token::Hex(hex) => parse_hex_code(hex),
        Token::Word(word) => Err(LoaderError::Parse(format!(
            "expected hex code, found '{word}'"
        ))),
    }
}

fn expect_cid(token: Token<'_>) -> Result<u32, LoaderError> {
    match token {
        Token::Word(word) => word
            .parse::<u32>()
            .map_err(|_| LoaderError::Parse(format!("invalid CID '{word}'"))),
        Token::Hex(hex) => Err(LoaderError::Parse(format!(
            "missing CID before '<{hex}>'"
        ))),
    }
}

/// Group tokens into entries of `width`, rejecting a trailing partial one.
fn group_entries<'t, 'a>(
    tokens: &'t [Token<'a>],
    width: usize,
    section: &str,
) -> Result<std::slice::ChunksExact<'t, Token<'a>>, LoaderError> {
    let chunks = tokens.chunks_exact(width);
    if !chunks.remainder().is_empty() {
        return Err(LoaderError::Parse(format!(
            "incomplete {section} entry: missing CID or bound"
        )));
    }
    Ok(chunks)
}

/// Reject growing `mappings` by `additional` past `max_mappings`.
fn check_mapping_limit(
    mappings: &[(ByteCode, u32)],
    additional: u64,
    max_mappings: usize,
) -> Result<(), LoaderError> {
    let total = mappings.len() as u64 + additional;
    if total > max_mappings as u64 {
        return Err(LoaderError::LimitExceeded {
            limit_name: "max_mappings",
            limit_value: max_mappings,
            actual_value: usize::try_from(total).unwrap_or(usize::MAX),
        });
    }
    Ok(())
}

/// Parse a begincodespacerange...endcodespacerange section.
///
/// The body is a sequence of `<low> <high>` pairs.
fn parse_codespace_section(
    section: &str,
    ranges: &mut Vec<CodespaceRange>,
) -> Result<(), LoaderError> {
    let tokens = tokenize(section)?;
    for pair in group_entries(&tokens, 2, "codespacerange")? {
        ranges.push(CodespaceRange {
            low: expect_hex(pair[0])?,
            high: expect_hex(pair[1])?,
        });
    }
    Ok(())
}

/// Parse a begincidchar...endcidchar section.
///
/// The body is a sequence of `<srcCode> CID` entries, any number per line.
fn parse_cidchar_section(
    section: &str,
    options: &LoaderOptions,
    mappings: &mut Vec<(ByteCode, u32)>,
) -> Result<(), LoaderError> {
    let tokens = tokenize(section)?;
    let entries = group_entries(&tokens, 2, "cidchar")?;
    check_mapping_limit(mappings, entries.len() as u64, options.max_mappings)?;
    for entry in entries {
        mappings.push((expect_hex(entry[0])?, expect_cid(entry[1])?));
    }
    Ok(())
}

/// Parse a begincidrange...endcidrange section.
///
/// The body is a sequence of `<srcLow> <srcHigh> CID_start` entries, any
/// number per line.
fn parse_cidrange_section(
    section: &str,
    options: &LoaderOptions,
    mappings: &mut Vec<(ByteCode, u32)>,
) -> Result<(), LoaderError> {
    let tokens = tokenize(section)?;
    for entry in group_entries(&tokens, 3, "cidrange")? {
        let low = expect_hex(entry[0])?;
        let high = expect_hex(entry[1])?;
        let cid_start = expect_cid(entry[2])?;
        if low.len() != high.len() {
            return Err(LoaderError::Parse(format!(
                "cidrange bounds {low} and {high} differ in width"
            )));
        }
        let (low_value, high_value) = (low.to_code(), high.to_code());
        if high_value < low_value {
            return Err(LoaderError::Parse(format!("cidrange {low}..{high} is reversed")));
        }
        let last_offset = high_value - low_value;
        let span = u64::from(last_offset) + 1;
        if span > u64::from(options.max_range_len) {
            return Err(LoaderError::LimitExceeded {
                limit_name: "max_range_len",
                limit_value: options.max_range_len as usize,
                actual_value: usize::try_from(span).unwrap_or(usize::MAX),
            });
        }
        if cid_start.checked_add(last_offset).is_none() {
            return Err(LoaderError::Parse(format!(
                "cidrange {low}..{high} starting at CID {cid_start} overflows"
            )));
        }
        check_mapping_limit(mappings, span, options.max_mappings)?;

        for offset in 0..=last_offset {
            let code = ByteCode::from_code(low_value + offset, low.len())?;
            mappings.push((code, cid_start + offset));
        }
    }
    Ok(())
}

/// Parse /CMapName from CMap data.
fn parse_cmap_name(text: &str) -> Option<String> {
    // Look for "/CMapName /SomeName def"
    let idx = text.find("/CMapName")?;
    let rest = text[idx + "/CMapName".len()..].trim_start();
    let rest = rest.strip_prefix('/')?;
    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    Some(rest[..end].to_string())
}

/// Parse /WMode from CMap data.
fn parse_writing_mode(text: &str) -> u8 {
    // Look for "/WMode N def"
    text.find("/WMode")
        .and_then(|idx| text[idx + "/WMode".len()..].trim_start().chars().next())
        .map(|ch| if ch == '1' { 1 } else { 0 })
        .unwrap_or(0)
}

/// Parse the parent name of "/Parent usecmap".
fn parse_use_cmap(text: &str) -> Option<String> {
    let idx = text.find("usecmap")?;
    let before = text[..idx].trim_end();
    let token = before.rsplit(char::is_whitespace).next()?;
    token.strip_prefix('/').map(str::to_string)
}

/// Parse /CIDSystemInfo in either the `<< ... >>` or `3 dict dup begin ...
/// end` form.
fn parse_system_info(text: &str) -> Result<Option<CidSystemInfo>, LoaderError> {
    let Some(idx) = text.find("/CIDSystemInfo") else {
        return Ok(None);
    };
    let rest = &text[idx..];
    let registry = string_value_after(rest, "/Registry");
    let ordering = string_value_after(rest, "/Ordering");
    let supplement = integer_value_after(rest, "/Supplement");
    match (registry, ordering, supplement) {
        (Some(registry), Some(ordering), Some(supplement)) => {
            Ok(Some(CidSystemInfo::new(registry, ordering, supplement)))
        }
        _ => Err(LoaderError::Parse("incomplete /CIDSystemInfo".to_string())),
    }
}

/// The `(string)` literal following `key`.
fn string_value_after<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    let idx = text.find(key)?;
    let rest = text[idx + key.len()..].trim_start().strip_prefix('(')?;
    let end = rest.find(')')?;
    Some(&rest[..end])
}

/// The non-negative integer following `key`.
fn integer_value_after(text: &str, key: &str) -> Option<u32> {
    let idx = text.find(key)?;
    let rest = text[idx + key.len()..].trim_start();
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}

/// Parse a hex token like "8140" into a byte code.
///
/// Whitespace inside the hex string is ignored.
fn parse_hex_code(hex: &str) -> Result<ByteCode, LoaderError> {
    let digits: Vec<u8> = hex.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if digits.is_empty() || digits.len() % 2 != 0 || !digits.iter().all(u8::is_ascii_hexdigit) {
        return Err(LoaderError::Parse(format!("invalid hex code '<{hex}>'")));
    }
    let bytes: Vec<u8> = digits
        .chunks(2)
        .map(|pair| {
            // Both characters are ASCII hex digits, checked above.
            let hi = (pair[0] as char).to_digit(16).unwrap_or(0) as u8;
            let lo = (pair[1] as char).to_digit(16).unwrap_or(0) as u8;
            (hi << 4) | lo
        })
        .collect();
    Ok(ByteCode::new(&bytes)?)
}
