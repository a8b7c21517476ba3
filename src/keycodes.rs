//! Translation between host key identifiers and target-tool keycodes.
//!
//! The host reports a pressed key or mouse button as a symbolic identifier
//! (`"a"`, `"Return"`, `"Shift_L"`, `"LMB"`). The remapping tool stores a numeric
//! keycode instead: USB-HID usage values for keyboard keys and negative values for
//! mouse buttons and controller inputs.
//!
//! The table is process-wide and immutable; see [`KeyCodeTable::global`].

use std::collections::HashMap;
use std::sync::LazyLock;

/// Canonical `(keycode, identifier)` pairs. Both columns are unique.
const KEY_CODES: &[(i64, &str)] = &[
    // Mouse buttons
    (-1, "LMB"),
    (-2, "RMB"),
    (-3, "MMB"),
    // Controller inputs
    (-10, "dpad_up"),
    (-11, "dpad_down"),
    (-12, "dpad_left"),
    (-13, "dpad_right"),
    (-14, "button_a"),
    (-15, "button_b"),
    (-16, "button_x"),
    (-17, "button_y"),
    (-18, "left_shoulder"),
    (-19, "right_shoulder"),
    (-20, "left_trigger"),
    (-21, "right_trigger"),
    // Letters
    (4, "a"),
    (5, "b"),
    (6, "c"),
    (7, "d"),
    (8, "e"),
    (9, "f"),
    (10, "g"),
    (11, "h"),
    (12, "i"),
    (13, "j"),
    (14, "k"),
    (15, "l"),
    (16, "m"),
    (17, "n"),
    (18, "o"),
    (19, "p"),
    (20, "q"),
    (21, "r"),
    (22, "s"),
    (23, "t"),
    (24, "u"),
    (25, "v"),
    (26, "w"),
    (27, "x"),
    (28, "y"),
    (29, "z"),
    // Digit row
    (30, "1"),
    (31, "2"),
    (32, "3"),
    (33, "4"),
    (34, "5"),
    (35, "6"),
    (36, "7"),
    (37, "8"),
    (38, "9"),
    (39, "0"),
    // Editing and punctuation
    (40, "Return"),
    (41, "Escape"),
    (42, "BackSpace"),
    (43, "Tab"),
    (44, "space"),
    (45, "minus"),
    (46, "equal"),
    (47, "bracketleft"),
    (48, "bracketright"),
    (49, "backslash"),
    (51, "semicolon"),
    (52, "apostrophe"),
    (53, "grave"),
    (54, "comma"),
    (55, "period"),
    (56, "slash"),
    (57, "Caps_Lock"),
    // Function keys
    (58, "F1"),
    (59, "F2"),
    (60, "F3"),
    (61, "F4"),
    (62, "F5"),
    (63, "F6"),
    (64, "F7"),
    (65, "F8"),
    (66, "F9"),
    (67, "F10"),
    (68, "F11"),
    (69, "F12"),
    // Navigation
    (73, "Insert"),
    (74, "Home"),
    (75, "Prior"),
    (76, "Delete"),
    (77, "End"),
    (78, "Next"),
    (79, "Right"),
    (80, "Left"),
    (81, "Down"),
    (82, "Up"),
    // Modifiers
    (224, "Control_L"),
    (225, "Shift_L"),
    (226, "Alt_L"),
    (227, "Meta_L"),
    (228, "Control_R"),
    (229, "Shift_R"),
    (230, "Alt_R"),
    (231, "Meta_R"),
];

/// Short labels for identifiers whose raw name is unwieldy on a small circle.
const DISPLAY_NAME_OVERRIDES: &[(&str, &str)] = &[
    ("Return", "⏎"),
    ("Escape", "Esc"),
    ("BackSpace", "⌫"),
    ("Tab", "⇥"),
    ("space", "␣"),
    ("minus", "-"),
    ("equal", "="),
    ("bracketleft", "["),
    ("bracketright", "]"),
    ("backslash", "\\"),
    ("semicolon", ";"),
    ("apostrophe", "'"),
    ("grave", "`"),
    ("comma", ","),
    ("period", "."),
    ("slash", "/"),
    ("Caps_Lock", "⇪"),
    ("Prior", "PgUp"),
    ("Next", "PgDn"),
    ("Delete", "⌦"),
    ("Up", "↑"),
    ("Down", "↓"),
    ("Left", "←"),
    ("Right", "→"),
    ("Control_L", "⌃"),
    ("Control_R", "R⌃"),
    ("Shift_L", "⇧"),
    ("Shift_R", "R⇧"),
    ("Alt_L", "⌥"),
    ("Alt_R", "R⌥"),
    ("Meta_L", "⌘"),
    ("Meta_R", "R⌘"),
    ("dpad_up", "D↑"),
    ("dpad_down", "D↓"),
    ("dpad_left", "D←"),
    ("dpad_right", "D→"),
    ("button_a", "Ⓐ"),
    ("button_b", "Ⓑ"),
    ("button_x", "Ⓧ"),
    ("button_y", "Ⓨ"),
    ("left_shoulder", "L1"),
    ("right_shoulder", "R1"),
    ("left_trigger", "L2"),
    ("right_trigger", "R2"),
];

static TABLE: LazyLock<KeyCodeTable> = LazyLock::new(KeyCodeTable::build);

/// A host key resolved into the target tool's vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    /// Target-tool keycode
    pub code: i64,
    /// Label shown on the button
    pub name: String,
}

/// Bidirectional keycode table plus display-name overrides.
#[derive(Debug)]
pub struct KeyCodeTable {
    code_to_key: HashMap<i64, &'static str>,
    key_to_code: HashMap<&'static str, i64>,
    display_overrides: HashMap<&'static str, &'static str>,
}

impl KeyCodeTable {
    fn build() -> Self {
        let code_to_key: HashMap<i64, &'static str> = KEY_CODES.iter().copied().collect();
        let key_to_code: HashMap<&'static str, i64> =
            KEY_CODES.iter().map(|&(code, key)| (key, code)).collect();
        let display_overrides = DISPLAY_NAME_OVERRIDES.iter().copied().collect();

        log::trace!("Key code table built with {} entries", code_to_key.len());

        Self {
            code_to_key,
            key_to_code,
            display_overrides,
        }
    }

    /// The shared table.
    pub fn global() -> &'static KeyCodeTable {
        &TABLE
    }

    /// Keycode for a host identifier, or `raw_code` if the identifier is unmapped.
    pub fn lookup_code(&self, identifier: &str, raw_code: i64) -> i64 {
        self.key_to_code.get(identifier).copied().unwrap_or(raw_code)
    }

    /// Display label for a host identifier.
    ///
    /// Overrides win; otherwise single-character identifiers are upper-cased and
    /// everything else is returned unchanged.
    pub fn lookup_name(&self, identifier: &str) -> String {
        if let Some(name) = self.display_overrides.get(identifier) {
            return (*name).to_string();
        }
        let mut chars = identifier.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => c.to_uppercase().collect(),
            _ => identifier.to_string(),
        }
    }

    /// Resolve a host key into both code and label.
    pub fn resolve(&self, identifier: &str, raw_code: i64) -> ResolvedKey {
        ResolvedKey {
            code: self.lookup_code(identifier, raw_code),
            name: self.lookup_name(identifier),
        }
    }

    /// Canonical identifier for a keycode.
    pub fn key_for_code(&self, code: i64) -> Option<&'static str> {
        self.code_to_key.get(&code).copied()
    }

    /// Keycode for a canonical identifier.
    pub fn code_for_key(&self, identifier: &str) -> Option<i64> {
        self.key_to_code.get(identifier).copied()
    }

    /// Canonical identifier whose display label is `name`, if any.
    pub fn key_for_display_name(&self, name: &str) -> Option<&'static str> {
        self.key_to_code
            .keys()
            .copied()
            .find(|key| self.lookup_name(key) == name)
    }

    /// All canonical `(keycode, identifier)` pairs in table order.
    pub fn entries(&self) -> impl Iterator<Item = (i64, &'static str)> + use<> {
        KEY_CODES.iter().copied()
    }

    /// Number of canonical entries.
    pub fn len(&self) -> usize {
        self.code_to_key.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.code_to_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_key_to_code_is_exact_inverse() {
        let table = KeyCodeTable::global();
        assert_eq!(table.code_to_key.len(), KEY_CODES.len(), "duplicate keycode");
        assert_eq!(table.key_to_code.len(), KEY_CODES.len(), "duplicate identifier");

        for (code, key) in table.entries() {
            assert_eq!(table.code_for_key(key), Some(code));
            assert_eq!(table.key_for_code(code), Some(key));
        }
    }

    #[test]
    fn test_display_names_round_trip_to_codes() {
        let table = KeyCodeTable::global();
        let names: HashSet<String> = table.entries().map(|(_, k)| table.lookup_name(k)).collect();
        assert_eq!(names.len(), table.len(), "display names must be unique");

        for (code, key) in table.entries() {
            let name = table.lookup_name(key);
            let back = table
                .key_for_display_name(&name)
                .unwrap_or_else(|| panic!("no identifier for display name {name}"));
            assert_eq!(table.lookup_code(back, i64::MIN), code);
        }
    }

    #[test]
    fn test_every_override_targets_a_canonical_key() {
        let table = KeyCodeTable::global();
        for (key, _) in DISPLAY_NAME_OVERRIDES {
            assert!(table.code_for_key(key).is_some(), "override for unknown key {key}");
        }
    }

    #[test]
    fn test_lookup_code_falls_back_to_raw() {
        let table = KeyCodeTable::global();
        assert_eq!(table.lookup_code("a", 999), 4);
        assert_eq!(table.lookup_code("LMB", 0), -1);
        assert_eq!(table.lookup_code("XF86AudioPlay", 172), 172);
    }

    #[test]
    fn test_lookup_name() {
        let table = KeyCodeTable::global();
        assert_eq!(table.lookup_name("q"), "Q");
        assert_eq!(table.lookup_name("7"), "7");
        assert_eq!(table.lookup_name("space"), "␣");
        assert_eq!(table.lookup_name("Up"), "↑");
        assert_eq!(table.lookup_name("LMB"), "LMB");
        assert_eq!(table.lookup_name("F5"), "F5");
        // Unmapped identifiers are still usable
        assert_eq!(table.lookup_name("é"), "É");
        assert_eq!(table.lookup_name("XF86AudioPlay"), "XF86AudioPlay");
    }

    #[test]
    fn test_resolve() {
        let key = KeyCodeTable::global().resolve("Shift_L", 50);
        assert_eq!(key.code, 225);
        assert_eq!(key.name, "⇧");
    }
}
