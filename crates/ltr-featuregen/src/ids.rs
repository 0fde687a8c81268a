//! Dense integer identifiers used throughout the index and scoring layers.

/// 1-based dense document id over the collection.
pub type DocId = u32;

/// 1-based dense term id. `0` is reserved for "unknown/missing term"
/// (spec §3, §9: every scorer loop must guard `if t == 0 { continue }`).
pub type TermId = u64;

/// Sentinel for "unknown term" (query term absent from the lexicon).
pub const UNKNOWN_TERM: TermId = 0;

/// Dense field identifier, `>= 1`. `0` means "field not indexed".
pub type FieldId = u32;

/// The well-known set of document fields that scorers aggregate over
/// (spec §3, §9). `Field` is a dense enum with an exhaustive match; an
/// unrecognized field name is a programmer error, not a runtime condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Body,
    Title,
    Heading,
    Inlink,
    A,
}

impl Field {
    /// The fields scorers produce a per-field score for, in emission order
    /// (spec §4.2).
    pub const SCORED: [Field; 5] =
        [Field::Body, Field::Title, Field::Heading, Field::Inlink, Field::A];

    pub fn name(self) -> &'static str {
        match self {
            Field::Body => "body",
            Field::Title => "title",
            Field::Heading => "heading",
            Field::Inlink => "inlink",
            Field::A => "a",
        }
    }
}

/// Extra document-structure tags counted (but never scored) alongside the
/// five [`Field`] variants (spec §4.2 "Document-structure counts";
/// supplemented from `original_source` with `applet`/`object`/`embed`,
/// which the original indexer tracks purely as presence counts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountOnlyTag {
    Applet,
    Object,
    Embed,
}

impl CountOnlyTag {
    pub const ALL: [CountOnlyTag; 3] =
        [CountOnlyTag::Applet, CountOnlyTag::Object, CountOnlyTag::Embed];

    pub fn name(self) -> &'static str {
        match self {
            CountOnlyTag::Applet => "applet",
            CountOnlyTag::Object => "object",
            CountOnlyTag::Embed => "embed",
        }
    }
}
