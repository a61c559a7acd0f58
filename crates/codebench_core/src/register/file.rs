//! Register groups and change tracking across debugger stops.

use super::{Register, RegisterFormat, RegisterKind, RegisterValue, SubView};
use crate::constants::ALL_REGISTERS_GROUP;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// A register plus the view state attached to it.
#[derive(Clone, Debug, PartialEq)]
pub struct RegisterEntry {
    pub register: Register,
    /// Radix used for the main value column.
    pub format: RegisterFormat,
    /// Whether the last update changed the value.
    pub changed: bool,
}

impl RegisterEntry {
    fn new(mut register: Register) -> Self {
        if register.kind == RegisterKind::Unknown {
            register.guess_missing_data();
        }
        Self {
            register,
            format: RegisterFormat::Hexadecimal,
            changed: true,
        }
    }

    /// Padded value text for the value column.
    pub fn display_text(&self) -> String {
        let reg = &self.register;
        reg.value.to_text(reg.kind, reg.size, self.format, false)
    }

    /// Value text placed into an edit field.
    pub fn edit_text(&self) -> String {
        let reg = &self.register;
        reg.value.to_text(reg.kind, reg.size, self.format, true)
    }

    pub fn tooltip(&self) -> String {
        let reg = &self.register;
        format!(
            "Current Value: {}\nPreviousValue: {}",
            reg.value.to_text(reg.kind, reg.size, self.format, false),
            reg.previous_value
                .to_text(reg.kind, reg.size, self.format, false)
        )
    }

    pub fn set_format(&mut self, format: RegisterFormat) {
        self.format = format;
    }

    /// Replace the value from user text in the current format.
    ///
    /// # Returns
    /// The `0x`-prefixed hex text to send to the debugger engine.
    pub fn edit(&mut self, text: &str) -> String {
        self.register.value = RegisterValue::parse(text, self.format);
        self.register.write_back_text()
    }

    /// Replace one element of `view` from user text in the view's format.
    ///
    /// # Returns
    /// The `0x`-prefixed hex text to send to the debugger engine.
    pub fn edit_element(&mut self, view: &SubView, index: usize, text: &str) -> String {
        let element = RegisterValue::parse(text, view.format);
        self.register.value.set_sub_value(view.size, index, element);
        self.register.write_back_text()
    }
}

/// Registers sharing one group name, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct RegisterGroup {
    name: String,
    entries: Vec<RegisterEntry>,
    by_name: HashMap<String, usize>,
}

impl RegisterGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[RegisterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, name: &str) -> Option<&RegisterEntry> {
        self.by_name.get(name).map(|&index| &self.entries[index])
    }

    pub fn entry_mut(&mut self, name: &str) -> Option<&mut RegisterEntry> {
        let index = *self.by_name.get(name)?;
        self.entries.get_mut(index)
    }

    /// Merge a freshly reported register.
    ///
    /// A register seen for the first time is added and reported as unchanged.
    /// Otherwise size and description are refreshed when supplied, and a new
    /// value moves the old one into `previous_value`.
    ///
    /// # Returns
    /// `true` when an existing register's value changed.
    pub fn update_register(&mut self, reg: &Register) -> bool {
        let Some(&index) = self.by_name.get(&reg.name) else {
            self.by_name.insert(reg.name.clone(), self.entries.len());
            self.entries.push(RegisterEntry::new(reg.clone()));
            return false;
        };

        let entry = &mut self.entries[index];
        if reg.size > 0 {
            entry.register.size = reg.size;
        }
        if !reg.description.is_empty() {
            entry.register.description = reg.description.clone();
        }
        if entry.register.value != reg.value {
            entry.changed = true;
            entry.register.previous_value = entry.register.value;
            entry.register.value = reg.value;
        } else {
            entry.changed = false;
        }
        entry.changed
    }
}

/// All register groups known for one debugger session, ordered by name.
#[derive(Clone, Debug, Default)]
pub struct RegisterFile {
    groups: BTreeMap<String, RegisterGroup>,
}

impl RegisterFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> impl Iterator<Item = &RegisterGroup> {
        self.groups.values()
    }

    pub fn group(&self, name: &str) -> Option<&RegisterGroup> {
        self.groups.get(name)
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut RegisterGroup> {
        self.groups.get_mut(name)
    }

    /// Merge a register into each of its groups, creating groups on demand.
    ///
    /// # Returns
    /// `true` when any group saw the value change.
    pub fn update_register(&mut self, reg: &Register) -> bool {
        let fallback = [ALL_REGISTERS_GROUP.to_string()];
        let groups: &[String] = if reg.groups.is_empty() {
            &fallback
        } else {
            &reg.groups
        };

        let mut changed = false;
        for group in groups {
            changed |= self
                .groups
                .entry(group.clone())
                .or_insert_with(|| RegisterGroup::new(group.clone()))
                .update_register(reg);
        }
        if changed {
            debug!(
                register = reg.name.as_str(),
                value = reg.value.low(),
                "register value changed"
            );
        }
        changed
    }

    /// The catch-all group, or the largest group when there is none.
    pub fn all_registers(&self) -> Option<&RegisterGroup> {
        if let Some(all) = self.groups.get(ALL_REGISTERS_GROUP) {
            return Some(all);
        }
        let mut best: Option<&RegisterGroup> = None;
        for group in self.groups.values() {
            if group.len() > best.map_or(0, RegisterGroup::len) {
                best = Some(group);
            }
        }
        best
    }

    /// Map from non-zero register values to register names, for annotating
    /// memory views.
    pub fn register_map(&self) -> BTreeMap<u64, String> {
        let mut map = BTreeMap::new();
        let Some(all) = self.all_registers() else {
            return map;
        };
        for entry in all.entries() {
            let address = entry.register.value.address();
            if address != 0 {
                map.insert(address, entry.register.name.clone());
            }
        }
        map
    }
}
