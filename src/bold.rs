use crate::pdf_utils::{as_number, decode_pdf_string, resolve_dict};
use indexmap::IndexSet;
use log::{debug, warn};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Encoding, Object, ObjectId, Stream};
use std::collections::BTreeMap;

/// Baselines closer than this (in user-space units) belong to the same line.
const Y_TOLERANCE: f32 = 1.0;

/// `TJ` adjustments more negative than this (thousandths of an em) read as a
/// word gap.
const TJ_WORD_GAP: f32 = 150.0;

/// `/FontWeight` at or above which a font counts as bold.
const BOLD_WEIGHT: f32 = 700.0;

/// ForceBold, bit 19 of the font descriptor `/Flags`.
const FORCE_BOLD_FLAG: i64 = 1 << 18;

/// Form XObjects drawn from inside other forms are followed this deep.
const MAX_FORM_DEPTH: usize = 8;

/// A font resource, reduced to what line collection needs.
struct PageFont<'a> {
    bold: bool,
    /// `None` when lopdf cannot build an encoding for the font; shown strings
    /// are then decoded as plain PDF strings.
    encoding: Option<Encoding<'a>>,
}

type FontMap<'a> = BTreeMap<Vec<u8>, PageFont<'a>>;

/// Fonts and form XObjects available to one content stream.
struct Resources<'a> {
    fonts: FontMap<'a>,
    forms: BTreeMap<Vec<u8>, &'a Stream>,
}

// ── BoldRunDetector ──────────────────────────────────────────────────────────

/// Finds the text lines a document renders in a bold font.
///
/// Each page's content stream is walked with a minimal text state: the active
/// font decides whether shown text is bold and how its bytes decode, and
/// vertical moves of the baseline split lines. Text shown in a regular font
/// ends the current bold run. Form XObjects drawn with `Do` are walked as
/// well.
pub struct BoldRunDetector<'a> {
    document: &'a Document,
}

impl<'a> BoldRunDetector<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    /// Distinct, trimmed bold lines in order of first appearance.
    ///
    /// Pages whose content cannot be decoded are skipped with a warning.
    pub fn bold_lines(&self) -> Vec<String> {
        let mut lines: IndexSet<String> = IndexSet::new();

        for (page_number, page_id) in self.document.get_pages() {
            let operations = match self.page_operations(page_id) {
                Ok(ops) => ops,
                Err(e) => {
                    warn!("page {page_number}: cannot decode content stream: {e}");
                    continue;
                }
            };
            let resources = self.page_resources(page_id);
            let mut collector = LineCollector::new();
            self.walk(&operations, &resources, &mut collector, 0);

            let page_lines = collector.finish();
            debug!("page {page_number}: {} bold line(s)", page_lines.len());
            lines.extend(page_lines);
        }

        lines.into_iter().collect()
    }

    fn page_operations(&self, page_id: ObjectId) -> lopdf::Result<Vec<Operation>> {
        let content = self.document.get_page_content(page_id)?;
        Ok(Content::decode(&content)?.operations)
    }

    /// Fonts and forms of a page, including those inherited through
    /// `/Parent`.
    fn page_resources(&self, page_id: ObjectId) -> Resources<'a> {
        let document = self.document;

        let fonts: FontMap<'a> = match document.get_page_fonts(page_id) {
            Ok(fonts) => fonts
                .into_iter()
                .map(|(name, font)| (name, self.page_font(font)))
                .collect(),
            Err(e) => {
                warn!("cannot read fonts of page {page_id:?}: {e}");
                FontMap::new()
            }
        };

        let mut forms = BTreeMap::new();
        if let Ok((own, inherited)) = document.get_page_resources(page_id) {
            let inherited = inherited
                .into_iter()
                .filter_map(|id| document.get_dictionary(id).ok());
            for dict in own.into_iter().chain(inherited) {
                self.collect_forms(dict, &mut forms);
            }
        }

        Resources { fonts, forms }
    }

    /// Resources declared directly in a form XObject's `/Resources`.
    fn form_resources(&self, resources: &'a Dictionary) -> Resources<'a> {
        let mut fonts = FontMap::new();
        if let Some(font_dict) = resources
            .get(b"Font")
            .ok()
            .and_then(|f| resolve_dict(self.document, f))
        {
            for (name, obj) in font_dict.iter() {
                if let Some(font) = resolve_dict(self.document, obj) {
                    fonts.insert(name.clone(), self.page_font(font));
                }
            }
        }

        let mut forms = BTreeMap::new();
        self.collect_forms(resources, &mut forms);
        Resources { fonts, forms }
    }

    fn collect_forms(&self, resources: &'a Dictionary, forms: &mut BTreeMap<Vec<u8>, &'a Stream>) {
        let Some(xobjects) = resources
            .get(b"XObject")
            .ok()
            .and_then(|x| resolve_dict(self.document, x))
        else {
            return;
        };

        for (name, obj) in xobjects.iter() {
            let stream = match obj {
                Object::Reference(id) => self.document.get_object(*id).and_then(Object::as_stream).ok(),
                Object::Stream(stream) => Some(stream),
                _ => None,
            };
            if let Some(stream) = stream.filter(|s| is_form(s)) {
                forms.entry(name.clone()).or_insert(stream);
            }
        }
    }

    fn page_font(&self, font: &'a Dictionary) -> PageFont<'a> {
        let encoding = match font.get_font_encoding(self.document) {
            Ok(encoding) => Some(encoding),
            Err(e) => {
                debug!("no font encoding, decoding raw strings: {e}");
                None
            }
        };
        PageFont {
            bold: font_is_bold(self.document, font),
            encoding,
        }
    }

    fn walk(
        &self,
        operations: &[Operation],
        resources: &Resources<'a>,
        collector: &mut LineCollector,
        depth: usize,
    ) {
        for op in operations {
            if op.operator == "Do" {
                self.walk_form(op, resources, collector, depth);
            } else {
                collector.apply(op, &resources.fonts);
            }
        }
    }

    /// Follow a `Do` into a form XObject. Image XObjects are ignored.
    fn walk_form(
        &self,
        op: &Operation,
        resources: &Resources<'a>,
        collector: &mut LineCollector,
        depth: usize,
    ) {
        let Some(form) = op
            .operands
            .first()
            .and_then(|name| name.as_name().ok())
            .and_then(|name| resources.forms.get(name).copied())
        else {
            return;
        };
        if depth >= MAX_FORM_DEPTH {
            warn!("form XObjects nested deeper than {MAX_FORM_DEPTH}, skipping");
            return;
        }

        let operations = match form.get_plain_content().and_then(|c| Content::decode(&c)) {
            Ok(content) => content.operations,
            Err(e) => {
                warn!("cannot decode form XObject: {e}");
                return;
            }
        };

        // A form has its own coordinate space; keep its lines apart.
        collector.flush();
        match form
            .dict
            .get(b"Resources")
            .ok()
            .and_then(|r| resolve_dict(self.document, r))
        {
            Some(own) => {
                let own = self.form_resources(own);
                self.walk(&operations, &own, collector, depth + 1);
            }
            None => self.walk(&operations, resources, collector, depth + 1),
        }
        collector.flush();
    }
}

fn is_form(stream: &Stream) -> bool {
    stream
        .dict
        .get(b"Subtype")
        .and_then(Object::as_name)
        .is_ok_and(|subtype| subtype == b"Form")
}

/// Bold by `/BaseFont` name, by a descriptor `/FontWeight` of at least 700, or
/// by the descriptor's ForceBold flag.
fn font_is_bold(document: &Document, font: &Dictionary) -> bool {
    let named_bold = font
        .get(b"BaseFont")
        .and_then(Object::as_name)
        .map(|name| base_font_is_bold(&String::from_utf8_lossy(name)))
        .unwrap_or(false);
    if named_bold {
        return true;
    }

    let Some(descriptor) = font
        .get(b"FontDescriptor")
        .ok()
        .and_then(|d| resolve_dict(document, d))
    else {
        return false;
    };

    let heavy = descriptor
        .get(b"FontWeight")
        .ok()
        .and_then(as_number)
        .is_some_and(|w| w >= BOLD_WEIGHT);
    let forced = descriptor
        .get(b"Flags")
        .and_then(Object::as_i64)
        .is_ok_and(|flags| flags & FORCE_BOLD_FLAG != 0);

    heavy || forced
}

/// Whether a `/BaseFont` name denotes a bold face, e.g. `Helvetica-Bold` or
/// `ABCDEF+OpenSans-ExtraBold`.
fn base_font_is_bold(base_font: &str) -> bool {
    let upper = base_font.to_ascii_uppercase();
    ["BOLD", "BLACK", "HEAVY"].iter().any(|w| upper.contains(w))
}

/// Candidate tags that exactly equal one of the detected bold lines, in
/// candidate order.
///
/// ```
/// # use pdftagmeta::filter_bold_tags;
/// let bold = vec!["The Challenge".to_string(), "Overview".to_string()];
/// let tags = filter_bold_tags(&["The Challenge", "The Approach"], &bold);
/// assert_eq!(tags, ["The Challenge"]);
/// ```
pub fn filter_bold_tags<S: AsRef<str>>(candidates: &[S], bold_lines: &[String]) -> Vec<String> {
    candidates
        .iter()
        .map(|tag| tag.as_ref())
        .filter(|tag| bold_lines.iter().any(|line| line.as_str() == *tag))
        .map(str::to_string)
        .collect()
}

// ── Content-stream walk ──────────────────────────────────────────────────────

/// Text state needed to split shown text into bold lines.
struct LineCollector {
    /// Resource name of the font selected by the last `Tf`.
    font: Option<Vec<u8>>,
    /// Current baseline, approximated in user space.
    y: f32,
    /// Vertical scale of the last `Tm`.
    scale: f32,
    leading: f32,
    /// Baseline of the text in `buf`.
    line_y: f32,
    /// A horizontal move happened since the last shown string.
    gap: bool,
    buf: String,
    lines: Vec<String>,
}

impl LineCollector {
    fn new() -> Self {
        Self {
            font: None,
            y: 0.0,
            scale: 1.0,
            leading: 0.0,
            line_y: 0.0,
            gap: false,
            buf: String::new(),
            lines: Vec::new(),
        }
    }

    fn apply(&mut self, op: &Operation, fonts: &FontMap<'_>) {
        let operands = &op.operands;
        let num = |i: usize| operands.get(i).and_then(as_number);

        match op.operator.as_str() {
            "BT" => {
                self.y = 0.0;
                self.scale = 1.0;
            }
            "Tf" => {
                self.font = operands
                    .first()
                    .and_then(|name| name.as_name().ok())
                    .map(<[u8]>::to_vec);
            }
            "Td" | "TD" => {
                let (tx, ty) = (num(0).unwrap_or(0.0), num(1).unwrap_or(0.0));
                if op.operator == "TD" {
                    self.leading = -ty;
                }
                self.move_by(tx, ty);
            }
            "TL" => self.leading = num(0).unwrap_or(self.leading),
            "Tm" => {
                if let (Some(d), Some(f)) = (num(3), num(5)) {
                    self.scale = if d == 0.0 { 1.0 } else { d.abs() };
                    self.y = f;
                    self.gap = true;
                }
            }
            "T*" => self.next_line(),
            "Tj" => self.show(operands.first(), fonts),
            "'" => {
                self.next_line();
                self.show(operands.first(), fonts);
            }
            "\"" => {
                self.next_line();
                self.show(operands.get(2), fonts);
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    self.show_array(items, fonts);
                }
            }
            _ => {}
        }
    }

    fn move_by(&mut self, tx: f32, ty: f32) {
        self.y += ty * self.scale;
        if tx != 0.0 {
            self.gap = true;
        }
    }

    fn next_line(&mut self) {
        self.move_by(0.0, -self.leading);
    }

    fn current_font<'f, 'a>(&self, fonts: &'f FontMap<'a>) -> Option<&'f PageFont<'a>> {
        self.font.as_deref().and_then(|name| fonts.get(name))
    }

    fn show(&mut self, operand: Option<&Object>, fonts: &FontMap<'_>) {
        if let Some(Object::String(bytes, _)) = operand {
            let font = self.current_font(fonts);
            let text = decode_shown(font, bytes);
            let bold = font.is_some_and(|f| f.bold);
            self.push_text(&text, bold);
        }
    }

    fn show_array(&mut self, items: &[Object], fonts: &FontMap<'_>) {
        let font = self.current_font(fonts);
        let bold = font.is_some_and(|f| f.bold);
        for item in items {
            match item {
                Object::String(bytes, _) => {
                    let text = decode_shown(font, bytes);
                    self.push_text(&text, bold);
                }
                other => {
                    if as_number(other).is_some_and(|adj| adj < -TJ_WORD_GAP) {
                        self.gap = true;
                    }
                }
            }
        }
    }

    fn push_text(&mut self, text: &str, bold: bool) {
        if text.is_empty() {
            return;
        }
        if !bold {
            self.flush();
            self.gap = false;
            return;
        }
        if !self.buf.is_empty() && (self.y - self.line_y).abs() > Y_TOLERANCE {
            self.flush();
        }
        if self.buf.is_empty() {
            self.line_y = self.y;
        } else if self.gap
            && !self.buf.ends_with(char::is_whitespace)
            && !text.starts_with(char::is_whitespace)
        {
            self.buf.push(' ');
        }
        self.buf.push_str(text);
        self.gap = false;
    }

    fn flush(&mut self) {
        let line = self.buf.trim();
        if !line.is_empty() {
            self.lines.push(line.to_string());
        }
        self.buf.clear();
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.lines
    }
}

/// Decode a shown string with the font's encoding, falling back to plain PDF
/// string decoding when the font has none or the bytes do not fit it.
fn decode_shown(font: Option<&PageFont<'_>>, bytes: &[u8]) -> String {
    font.and_then(|f| f.encoding.as_ref())
        .and_then(|encoding| Document::decode_text(encoding, bytes).ok())
        .unwrap_or_else(|| decode_pdf_string(bytes))
}
