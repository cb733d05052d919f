use super::field::{ExistingValue, FieldKind, FieldValue, ParsedValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    InvalidExisting,
    Current,
    Default,
    Custom,
}

/// One selectable option in a field prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    InvalidExisting { raw: String, error: String },
    Current(FieldValue),
    Default(FieldValue),
    Custom,
}

impl Slot {
    pub fn kind(&self) -> SlotKind {
        match self {
            Slot::InvalidExisting { .. } => SlotKind::InvalidExisting,
            Slot::Current(_) => SlotKind::Current,
            Slot::Default(_) => SlotKind::Default,
            Slot::Custom => SlotKind::Custom,
        }
    }

    pub fn value(&self) -> Option<&FieldValue> {
        match self {
            Slot::Current(value) | Slot::Default(value) => Some(value),
            Slot::InvalidExisting { .. } | Slot::Custom => None,
        }
    }
}

/// Boolean fields with nothing stored and no declared default fall back to `false`.
pub fn effective_default(
    kind: FieldKind,
    existing: &ExistingValue,
    default: Option<&FieldValue>,
) -> Option<FieldValue> {
    match default {
        Some(value) => Some(value.clone()),
        None if kind == FieldKind::Boolean && existing.current().is_none() => {
            Some(FieldValue::Boolean(false))
        }
        None => None,
    }
}

/// Slot order is always `[InvalidExisting?, Current?, Default?, Custom?]`.
pub fn compute_slots(
    kind: FieldKind,
    existing: &ExistingValue,
    default: Option<&FieldValue>,
) -> Vec<Slot> {
    let mut slots = Vec::with_capacity(4);
    match &existing.parsed {
        ParsedValue::ParseError(error) => slots.push(Slot::InvalidExisting {
            raw: existing.raw.clone().unwrap_or_default(),
            error: error.clone(),
        }),
        ParsedValue::Ok(value) => slots.push(Slot::Current(value.clone())),
        ParsedValue::Absent => {}
    }
    if let Some(default) = effective_default(kind, existing, default) {
        if existing.current() != Some(&default) {
            slots.push(Slot::Default(default));
        }
    }
    if !(kind == FieldKind::Boolean && covers_both_booleans(&slots)) {
        slots.push(Slot::Custom);
    }
    slots
}

fn covers_both_booleans(slots: &[Slot]) -> bool {
    let has = |target: bool| {
        slots
            .iter()
            .any(|slot| slot.value() == Some(&FieldValue::Boolean(target)))
    };
    has(true) && has(false)
}

/// Current first, then the default, then the first slot that is not an invalid value.
pub fn initial_cursor(slots: &[Slot]) -> usize {
    slots
        .iter()
        .position(|slot| slot.kind() == SlotKind::Current)
        .or_else(|| {
            slots
                .iter()
                .position(|slot| slot.kind() == SlotKind::Default)
        })
        .or_else(|| {
            slots
                .iter()
                .position(|slot| slot.kind() != SlotKind::InvalidExisting)
        })
        .unwrap_or(0)
}

pub fn custom_index(slots: &[Slot]) -> Option<usize> {
    slots.iter().position(|slot| slot.kind() == SlotKind::Custom)
}

pub fn wrap_cursor(cursor: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (cursor + 1) % len
    } else {
        (cursor + len - 1) % len
    }
}
