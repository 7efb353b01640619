//! MTL (Material Template Library) file parser
//!
//! Parses Wavefront .mtl files into a [`MaterialCollection`]. Only the Phong
//! directives `newmtl`, `Ka`, `Kd`, `Ks`, `Ns`, `Tr` and `d` are understood;
//! every other line is skipped so files written by other tools still load.
//!
//! Parsing is tolerant: a line that does not fit the grammar leaves the
//! collection untouched and never fails the parse. Only I/O errors are
//! reported.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::collection::{MaterialCollection, MaterialHandle, DEFAULT_MAX_NAME_LEN};
use super::phong::{Color, Material};
use crate::{MtlError, Result};

/// What to do with a `newmtl` naming a material that already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the first definition and drop the body of the repeated one
    ///
    /// Field directives following the duplicate `newmtl` apply to nothing
    /// until the next `newmtl`.
    #[default]
    Discard,
    /// Keep the first definition and apply the repeated body to it
    Merge,
}

/// Parser settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Handling of repeated material names
    pub duplicate_policy: DuplicatePolicy,
    /// Names longer than this many bytes are truncated; `None` keeps them whole
    ///
    /// Config files store a plain byte count, with `0` meaning no limit.
    #[serde(with = "name_limit")]
    pub max_name_len: Option<usize>,
}

/// On-disk form of `max_name_len`
///
/// TOML has no null, so "no limit" is written as `0` instead of being left out.
mod name_limit {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(limit: &Option<usize>, serializer: S) -> Result<S::Ok, S::Error> {
        limit.unwrap_or(0).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<usize>, D::Error> {
        let max = usize::deserialize(deserializer)?;
        Ok((max != 0).then_some(max))
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Discard,
            max_name_len: Some(DEFAULT_MAX_NAME_LEN),
        }
    }
}

/// One recognized directive line
#[derive(Debug, Clone, Copy, PartialEq)]
enum Directive<'a> {
    NewMaterial(&'a str),
    Ambient(Color),
    Diffuse(Color),
    Specular(Color),
    Shininess(f32),
    Transparency(f32),
    Dissolve(f32),
}

impl<'a> Directive<'a> {
    /// Match a line against the directive grammar
    ///
    /// The keyword is the first whitespace-delimited token and must match
    /// exactly. Arguments beyond the required arity are ignored.
    fn parse(line: &'a str) -> Option<Self> {
        let mut tokens = line.split_whitespace();
        let keyword = tokens.next()?;

        let directive = match keyword {
            "newmtl" => Self::NewMaterial(tokens.next()?),
            "Ka" => Self::Ambient(parse_color(&mut tokens)?),
            "Kd" => Self::Diffuse(parse_color(&mut tokens)?),
            "Ks" => Self::Specular(parse_color(&mut tokens)?),
            "Ns" => Self::Shininess(parse_f32(&mut tokens)?),
            "Tr" => Self::Transparency(parse_f32(&mut tokens)?),
            "d" => Self::Dissolve(parse_f32(&mut tokens)?),
            _ => return None,
        };
        Some(directive)
    }
}

/// Parse a single f32 value
fn parse_f32<'a, I>(tokens: &mut I) -> Option<f32>
where
    I: Iterator<Item = &'a str>,
{
    tokens.next()?.parse::<f32>().ok()
}

/// Parse a color from RGB tokens
fn parse_color<'a, I>(tokens: &mut I) -> Option<Color>
where
    I: Iterator<Item = &'a str>,
{
    let r = parse_f32(tokens)?;
    let g = parse_f32(tokens)?;
    let b = parse_f32(tokens)?;
    Some(Color::new(r, g, b))
}

/// Decode one raw line, UTF-8 when valid and ISO-8859-1 otherwise
fn decode_line(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().copied().map(char::from).collect()),
    }
}

/// Cut `name` to at most `max` bytes without splitting a character
fn truncate_name(name: &str, max: Option<usize>) -> &str {
    match max {
        Some(max) if name.len() > max => {
            let mut end = max;
            while !name.is_char_boundary(end) {
                end -= 1;
            }
            &name[..end]
        }
        _ => name,
    }
}

/// Accumulates materials while lines are fed in
struct ParseState {
    options: ParseOptions,
    collection: MaterialCollection,
    /// Material that field directives apply to
    current: Option<MaterialHandle>,
}

impl ParseState {
    fn new(options: ParseOptions) -> Self {
        Self {
            options,
            collection: MaterialCollection::with_name_limit(options.max_name_len),
            current: None,
        }
    }

    fn feed_line(&mut self, line: &str, line_num: usize) {
        // Skip empty lines and comments
        if line.trim().is_empty() || line.starts_with('#') {
            return;
        }

        // Keywords must start in the first column
        if line.starts_with(char::is_whitespace) {
            log::trace!("Line {}: indented, skipping '{}'", line_num + 1, line);
            return;
        }

        let Some(directive) = Directive::parse(line) else {
            log::trace!("Line {}: skipping '{}'", line_num + 1, line);
            return;
        };

        if let Directive::NewMaterial(name) = directive {
            self.begin_material(name, line_num);
            return;
        }

        let Some(material) = self.current.and_then(|handle| self.collection.get_mut(handle)) else {
            log::trace!("Line {}: no current material, skipping '{}'", line_num + 1, line);
            return;
        };

        match directive {
            Directive::Ambient(color) => material.ambient = color,
            Directive::Diffuse(color) => material.diffuse = color,
            Directive::Specular(color) => material.specular = color,
            Directive::Shininess(value) => material.shininess = value,
            Directive::Transparency(value) => material.transparency = value,
            Directive::Dissolve(value) => material.set_dissolve(value),
            Directive::NewMaterial(_) => {}
        }
    }

    fn begin_material(&mut self, name: &str, line_num: usize) {
        let name = truncate_name(name, self.options.max_name_len);
        if name.is_empty() {
            log::trace!("Line {}: material name truncated to nothing, skipping", line_num + 1);
            return;
        }

        let (handle, inserted) = match self.collection.insert(name, Material::DEFAULT) {
            Ok(result) => result,
            Err(err) => {
                log::trace!("Line {}: {}, skipping", line_num + 1, err);
                return;
            }
        };
        if inserted {
            self.current = Some(handle);
            return;
        }

        match self.options.duplicate_policy {
            DuplicatePolicy::Discard => {
                log::debug!(
                    "Line {}: duplicate material '{}', ignoring its definition",
                    line_num + 1,
                    name
                );
                self.current = None;
            }
            DuplicatePolicy::Merge => {
                log::debug!(
                    "Line {}: duplicate material '{}', merging into first definition",
                    line_num + 1,
                    name
                );
                self.current = Some(handle);
            }
        }
    }

    fn finish(self) -> MaterialCollection {
        log::debug!("Parsed MTL: {} materials", self.collection.len());
        self.collection
    }
}

/// MTL file parser
#[derive(Debug, Clone, Copy, Default)]
pub struct MtlParser {
    options: ParseOptions,
}

impl MtlParser {
    /// Create a parser with the given options
    pub const fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Options this parser was built with
    pub const fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse MTL contents with default options
    pub fn parse(contents: &str) -> MaterialCollection {
        Self::default().parse_str(contents)
    }

    /// Parse MTL file contents into a material collection
    ///
    /// Never fails: malformed and unknown lines are skipped.
    pub fn parse_str(&self, contents: &str) -> MaterialCollection {
        let mut state = ParseState::new(self.options);
        for (line_num, line) in contents.lines().enumerate() {
            state.feed_line(line, line_num);
        }
        state.finish()
    }

    /// Parse from a buffered reader
    ///
    /// # Errors
    /// [`MtlError::Open`] if reading fails part way through.
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<MaterialCollection> {
        self.parse_buffered(reader, &MtlError::stream_path("reader"))
    }

    /// Parse an MTL file from disk
    ///
    /// # Arguments
    /// * `path` - Path to the .mtl file
    ///
    /// # Errors
    /// [`MtlError::InvalidInput`] for an empty path, [`MtlError::Open`] if the
    /// file cannot be opened or read.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<MaterialCollection> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(MtlError::InvalidInput("empty path".to_string()));
        }

        let file = File::open(path).map_err(|source| MtlError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_buffered(BufReader::new(file), path)
    }

    fn parse_buffered<R: BufRead>(&self, mut reader: R, path: &Path) -> Result<MaterialCollection> {
        let mut state = ParseState::new(self.options);
        let mut buf = Vec::new();
        let mut line_num = 0;

        loop {
            buf.clear();
            let read = reader.read_until(b'\n', &mut buf).map_err(|source| MtlError::Open {
                path: path.to_path_buf(),
                source,
            })?;
            if read == 0 {
                break;
            }

            let mut line = buf.as_slice();
            if let Some(stripped) = line.strip_suffix(b"\n") {
                line = stripped;
            }
            if let Some(stripped) = line.strip_suffix(b"\r") {
                line = stripped;
            }

            state.feed_line(&decode_line(line), line_num);
            line_num += 1;
        }

        Ok(state.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::io::Cursor;

    #[test]
    fn test_parse_simple_material() {
        let mtl_content = r#"
# Simple material
newmtl TestMaterial
Ka 1.0 1.0 1.0
Kd 0.8 0.2 0.2
Ks 0.5 0.5 0.5
Ns 250.0
d 1.0
illum 2
"#;

        let materials = MtlParser::parse(mtl_content);
        assert_eq!(materials.len(), 1);

        let mat = materials.at("TestMaterial").unwrap();
        assert_eq!(mat.ambient, Color::new(1.0, 1.0, 1.0));
        assert_eq!(mat.diffuse, Color::new(0.8, 0.2, 0.2));
        assert_eq!(mat.specular, Color::new(0.5, 0.5, 0.5));
        assert_eq!(mat.shininess, 250.0);
        assert_eq!(mat.transparency, 0.0);
    }

    #[test]
    fn test_parse_multiple_materials() {
        let mtl_content = r#"
newmtl Material1
Kd 1.0 0.0 0.0

newmtl Material2
Kd 0.0 1.0 0.0
"#;

        let materials = MtlParser::parse(mtl_content);
        assert_eq!(materials.len(), 2);

        assert_eq!(materials.at("Material1").unwrap().diffuse, Color::new(1.0, 0.0, 0.0));
        assert_eq!(materials.at("Material2").unwrap().diffuse, Color::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let materials = MtlParser::parse("newmtl A\n");
        assert_eq!(materials.at("A").unwrap(), &Material::default());
    }

    #[test]
    fn test_dissolve_and_transparency_agree() {
        let from_d = MtlParser::parse("newmtl A\nd 0.3\n");
        let from_tr = MtlParser::parse("newmtl A\nTr 0.7\n");

        let d = from_d.at("A").unwrap().transparency;
        let tr = from_tr.at("A").unwrap().transparency;
        assert_abs_diff_eq!(d, 0.7, epsilon = 1e-6);
        assert_abs_diff_eq!(d, tr, epsilon = 1e-6);
    }

    #[test]
    fn test_last_transparency_directive_wins() {
        let materials = MtlParser::parse("newmtl A\nTr 0.25\nd 0.9\n");
        assert_abs_diff_eq!(materials.at("A").unwrap().transparency, 0.1, epsilon = 1e-6);

        let materials = MtlParser::parse("newmtl A\nd 0.9\nTr 0.25\n");
        assert_eq!(materials.at("A").unwrap().transparency, 0.25);
    }

    #[test]
    fn test_duplicate_discards_second_body() {
        let materials = MtlParser::parse("newmtl A\nKa 1 1 1\nnewmtl A\nKa 0 0 0\n");
        assert_eq!(materials.len(), 1);
        assert_eq!(materials.at("A").unwrap().ambient, Color::WHITE);
    }

    #[test]
    fn test_duplicate_body_not_applied_to_previous_material() {
        let materials = MtlParser::parse("newmtl A\nnewmtl B\nnewmtl A\nNs 10\nnewmtl C\nNs 20\n");
        assert_eq!(materials.at("A").unwrap().shininess, 0.0);
        assert_eq!(materials.at("B").unwrap().shininess, 0.0);
        assert_eq!(materials.at("C").unwrap().shininess, 20.0);
    }

    #[test]
    fn test_duplicate_merge_policy() {
        let parser = MtlParser::new(ParseOptions {
            duplicate_policy: DuplicatePolicy::Merge,
            ..ParseOptions::default()
        });
        let materials = parser.parse_str("newmtl A\nKa 1 1 1\nnewmtl B\nnewmtl A\nNs 5\n");

        let a = materials.at("A").unwrap();
        assert_eq!(a.ambient, Color::WHITE);
        assert_eq!(a.shininess, 5.0);
        assert_eq!(materials.at("B").unwrap().shininess, 0.0);
    }

    #[test]
    fn test_unknown_directive_does_not_reset_state() {
        let materials = MtlParser::parse("newmtl A\nmap_Kd tex.png\nKa 0.5 0.5 0.5\n");
        assert_eq!(materials.at("A").unwrap().ambient, Color::gray(0.5));
    }

    #[test]
    fn test_fields_before_newmtl_ignored() {
        let materials = MtlParser::parse("Ka 0 0 0\nNs 12\nnewmtl A\n");
        assert_eq!(materials.at("A").unwrap(), &Material::default());
    }

    #[test]
    fn test_short_color_leaves_field_unchanged() {
        let materials = MtlParser::parse("newmtl A\nKd 0.1 0.2\nKs 0.3 x 0.4\nNs\n");
        let mat = materials.at("A").unwrap();
        assert_eq!(mat.diffuse, Material::DEFAULT.diffuse);
        assert_eq!(mat.specular, Material::DEFAULT.specular);
        assert_eq!(mat.shininess, 0.0);
    }

    #[test]
    fn test_extra_tokens_ignored() {
        let materials = MtlParser::parse("newmtl A extra\nKd 0.1 0.2 0.3 0.4\n");
        assert_relative_eq!(materials.at("A").unwrap().diffuse, Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_keywords_match_exact_tokens() {
        let materials = MtlParser::parse("newmtl A\nKaa 0 0 0\nK 0 0 0\nNs10\ndissolve 0.5\nka 0 0 0\n");
        assert_eq!(materials.at("A").unwrap(), &Material::default());

        let materials = MtlParser::parse("newmtlB\n");
        assert!(materials.is_empty());
    }

    #[test]
    fn test_newmtl_without_name_keeps_context() {
        let materials = MtlParser::parse("newmtl A\nnewmtl\nNs 8\n");
        assert_eq!(materials.len(), 1);
        assert_eq!(materials.at("A").unwrap().shininess, 8.0);
    }

    #[test]
    fn test_comment_and_blank_only() {
        let materials = MtlParser::parse("# header\n\n   \n#newmtl Hidden\n\r\n");
        assert!(materials.is_empty());
    }

    #[test]
    fn test_indented_lines_are_not_directives() {
        let materials = MtlParser::parse("newmtl A\n\tKa 0.1 0.1 0.1\n    Ns 3\nKd 0.5 0.5 0.5\n");
        let mat = materials.at("A").unwrap();
        assert_eq!(mat.ambient, Material::DEFAULT.ambient);
        assert_eq!(mat.shininess, 0.0);
        assert_eq!(mat.diffuse, Color::gray(0.5));

        let materials = MtlParser::parse("  newmtl Hidden\n\tnewmtl AlsoHidden\n");
        assert!(materials.is_empty());
    }

    #[test]
    fn test_indented_comment_is_skipped() {
        let materials = MtlParser::parse("newmtl A\n   # Ns 9\nNs 4\n");
        assert_eq!(materials.at("A").unwrap().shininess, 4.0);
    }

    #[test]
    fn test_out_of_range_values_pass_through() {
        let materials = MtlParser::parse("newmtl A\nKd 2.5 -1 0\nTr 3\n");
        let mat = materials.at("A").unwrap();
        assert_eq!(mat.diffuse, Color::new(2.5, -1.0, 0.0));
        assert_eq!(mat.transparency, 3.0);
    }

    #[test]
    fn test_crlf_reader() {
        let input = b"newmtl A\r\nKa 0.25 0.5 0.75\r\nNs 4\r\n";
        let materials = MtlParser::default().parse_reader(Cursor::new(&input[..])).unwrap();

        let mat = materials.at("A").unwrap();
        assert_eq!(mat.ambient, Color::new(0.25, 0.5, 0.75));
        assert_eq!(mat.shininess, 4.0);
    }

    #[test]
    fn test_latin1_name_decoded() {
        let input = b"newmtl caf\xe9\nNs 2\n";
        let materials = MtlParser::default().parse_reader(Cursor::new(&input[..])).unwrap();
        assert_eq!(materials.at("caf\u{e9}").unwrap().shininess, 2.0);
    }

    #[test]
    fn test_long_name_truncated() {
        let long = "m".repeat(300);
        let materials = MtlParser::parse(&format!("newmtl {long}\nNs 1\n"));

        let name = materials.names().next().unwrap();
        assert_eq!(name.len(), DEFAULT_MAX_NAME_LEN);
        assert_eq!(materials.at(name).unwrap().shininess, 1.0);
    }

    #[test]
    fn test_truncation_respects_char_boundary() {
        assert_eq!(truncate_name("ab\u{e9}", Some(3)), "ab");
        assert_eq!(truncate_name("abc", Some(3)), "abc");
        assert_eq!(truncate_name("abcdef", None), "abcdef");
    }

    #[test]
    fn test_unlimited_names() {
        let parser = MtlParser::new(ParseOptions {
            max_name_len: None,
            ..ParseOptions::default()
        });
        let long = "n".repeat(1000);
        let materials = parser.parse_str(&format!("newmtl {long}\n"));
        assert!(materials.contains(&long));
        assert_eq!(materials.name_limit(), None);
    }

    #[test]
    fn test_parsed_collection_keeps_name_limit() {
        let parser = MtlParser::new(ParseOptions {
            max_name_len: Some(8),
            ..ParseOptions::default()
        });
        let mut materials = parser.parse_str("newmtl abcdefghij\n");
        assert!(materials.contains("abcdefgh"));
        assert!(matches!(
            materials.insert("abcdefghij", Material::default()),
            Err(MtlError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let result = MtlParser::default().parse_file("/nonexistent/path.mtl");
        assert!(matches!(result, Err(MtlError::Open { .. })));
    }

    #[test]
    fn test_empty_path_is_invalid_input() {
        let result = MtlParser::default().parse_file("");
        assert!(matches!(result, Err(MtlError::InvalidInput(_))));
    }

    #[test]
    fn test_reader_failure_is_open_error() {
        struct FailingReader;

        impl std::io::Read for FailingReader {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "disk fault"))
            }
        }

        let result = MtlParser::default().parse_reader(BufReader::new(FailingReader));
        assert!(matches!(result, Err(MtlError::Open { .. })));
    }
}
