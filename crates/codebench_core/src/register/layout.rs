//! Register metadata and the sub-views derived from a register's size.

use super::{RegisterFormat, RegisterKind, RegisterValue};

/// One register as reported by a debugger engine.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Register {
    pub name: String,
    /// Type string as reported by the debugger (`int`, `vec128`, ...).
    pub reported_type: String,
    pub description: String,
    pub kind: RegisterKind,
    /// Width in bytes.
    pub size: usize,
    pub value: RegisterValue,
    pub previous_value: RegisterValue,
    /// Groups the register belongs to; empty means the catch-all group.
    pub groups: Vec<String>,
}

impl Register {
    /// Create a register with a name, size and value; the kind is left for
    /// [`Register::guess_missing_data`] or the caller to fill in.
    pub fn new(name: impl Into<String>, size: usize, value: RegisterValue) -> Self {
        Self {
            name: name.into(),
            size,
            value,
            ..Self::default()
        }
    }

    /// Infer [`Register::kind`] from the reported type or the register name.
    pub fn guess_missing_data(&mut self) {
        let ty = self.reported_type.as_str();
        self.kind = if ty == "int" {
            RegisterKind::Integer
        } else if ty == "float" || ty == "_i387_ext" {
            RegisterKind::Float
        } else if ty == "*1" || ty == "long" {
            RegisterKind::Integer
        } else if ty.contains("vec") {
            RegisterKind::Vector
        } else if ty.starts_with("int") {
            RegisterKind::Integer
        } else if self.name.starts_with("xmm") || self.name.starts_with("ymm") {
            RegisterKind::Vector
        } else {
            return;
        };
    }

    /// Name shown in the register list, with the description if any.
    pub fn display_name(&self) -> String {
        if self.description.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.description)
        }
    }

    /// Text handed back to the debugger engine after an edit.
    pub fn write_back_text(&self) -> String {
        format!(
            "0x{}",
            self.value
                .to_text(self.kind, self.size, RegisterFormat::Hexadecimal, false)
        )
    }

    /// Alternative interpretations of this register's bits.
    ///
    /// Integer and vector registers get whole-value decimal views (when they
    /// fit in 64 bits), then hex/signed/unsigned views for every halving of
    /// the element width, a character view for bytes, and float views for
    /// element widths of four bytes and up. Other kinds have no sub-views.
    pub fn sub_views(&self) -> Vec<SubView> {
        let mut views = Vec::new();
        if !matches!(self.kind, RegisterKind::Integer | RegisterKind::Vector) {
            return views;
        }
        let size = self.size;
        if size <= 8 {
            views.push(SubView::integer(size, 1, RegisterFormat::SignedDecimal));
            views.push(SubView::integer(size, 1, RegisterFormat::Decimal));
        }
        let mut element = size / 2;
        while element > 0 {
            let count = size / element;
            views.push(SubView::integer(element, count, RegisterFormat::Hexadecimal));
            views.push(SubView::integer(element, count, RegisterFormat::SignedDecimal));
            views.push(SubView::integer(element, count, RegisterFormat::Decimal));
            if element == 1 {
                views.push(SubView::integer(element, count, RegisterFormat::Character));
            }
            element /= 2;
        }
        let mut element = size;
        while element >= 4 {
            views.push(SubView {
                kind: RegisterKind::Float,
                size: element,
                count: size / element,
                format: RegisterFormat::Decimal,
            });
            element /= 2;
        }
        views
    }
}

/// Short tag naming a sub-view, e.g. `[i4x]` for 4-byte hex integers.
pub fn sub_type_name(kind: RegisterKind, size: usize, format: RegisterFormat) -> String {
    let mut name = String::from("[");
    match kind {
        RegisterKind::Integer => name.push('i'),
        RegisterKind::Float => name.push('f'),
        RegisterKind::Vector | RegisterKind::Unknown => {}
    }
    name.push_str(&size.to_string());
    name.push(format.suffix());
    name.push(']');
    name
}

/// A register reinterpreted as `count` elements of `size` bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubView {
    pub kind: RegisterKind,
    pub size: usize,
    pub count: usize,
    pub format: RegisterFormat,
}

impl SubView {
    fn integer(size: usize, count: usize, format: RegisterFormat) -> Self {
        Self {
            kind: RegisterKind::Integer,
            size,
            count,
            format,
        }
    }

    pub fn name(&self) -> String {
        sub_type_name(self.kind, self.size, self.format)
    }

    /// Text of a single element.
    pub fn element_text(&self, value: &RegisterValue, index: usize, for_editing: bool) -> String {
        value
            .sub_value(self.size, index)
            .to_text(self.kind, self.size, self.format, for_editing)
    }

    /// All elements on one line, element `i` right-aligned to end at column
    /// `5 * (i + 1) * size`.
    pub fn render(&self, value: &RegisterValue) -> String {
        let mut line = String::new();
        let mut columns = 0usize;
        for index in 0..self.count {
            let tab = 5 * (index + 1) * self.size;
            let text = self.element_text(value, index, false);
            let text_columns = text.chars().count();
            let pad = tab.saturating_sub(columns + text_columns);
            line.extend(std::iter::repeat(' ').take(pad));
            line.push_str(&text);
            columns += pad + text_columns;
        }
        line
    }

    /// Human readable summary of what the view shows.
    pub fn description(&self) -> Option<String> {
        let bits = 8 * self.size;
        match self.kind {
            RegisterKind::Integer => Some(match self.format {
                RegisterFormat::Character => "Content as ASCII Characters".to_string(),
                RegisterFormat::SignedDecimal => {
                    format!("Content as {bits}-bit Signed Decimal Values")
                }
                RegisterFormat::Decimal => format!("Content as {bits}-bit Unsigned Decimal Values"),
                RegisterFormat::Hexadecimal => format!("Content as {bits}-bit Hexadecimal Values"),
                RegisterFormat::Octal => format!("Content as {bits}-bit Octal Values"),
                RegisterFormat::Binary => format!("Content as {bits}-bit Binary Values"),
            }),
            RegisterKind::Float => Some(format!("Content as {bits}-bit Floating Point Values")),
            RegisterKind::Vector | RegisterKind::Unknown => None,
        }
    }

    /// Hint shown when editing one element of `register_name`.
    pub fn element_hint(&self, register_name: &str, index: usize) -> String {
        format!(
            "Edit bits {}...{} of register {}",
            index * 8,
            index * 8 + 7,
            register_name
        )
    }
}
