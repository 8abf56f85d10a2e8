//! Offset-based text insertion.

/// Text to insert at a byte offset of the untransformed code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub position: usize,
    pub text: String,
}

impl Patch {
    pub fn new(position: usize, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
        }
    }
}

/// Apply `patches` to `code`, highest offset first, so each insertion leaves
/// the offsets of the remaining ones intact.
///
/// Patches sharing an offset end up in the text in the order they were
/// produced.
pub fn apply_patches(code: &str, patches: Vec<Patch>) -> String {
    let mut ordered: Vec<(usize, Patch)> = patches.into_iter().enumerate().collect();
    ordered.sort_by(|(a_seq, a), (b_seq, b)| {
        b.position.cmp(&a.position).then_with(|| b_seq.cmp(a_seq))
    });

    let extra: usize = ordered.iter().map(|(_, patch)| patch.text.len()).sum();
    let mut output = String::with_capacity(code.len() + extra);
    output.push_str(code);
    for (_, patch) in ordered {
        if patch.text.is_empty() {
            continue;
        }
        let position = patch.position.min(output.len());
        output.insert_str(position, &patch.text);
    }
    output
}
