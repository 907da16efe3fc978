//! Parser configuration (spec §6). A plain struct with a hand-written `Default` impl per
//! configurable type — no external config-loading crate, matching the teacher crate's own
//! `impl_default.rs`, which hand-implements `Default`/`TokenImpl`/`NodeImpl` per primitive
//! type rather than leaning on `#[derive(Default)]` for anything with a non-trivial default.

/// Target ECMAScript edition. Gates reserved-word sets and syntax features (spec §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EcmaVersion {
    Es3,
    Es5,
    Es2015,
    Es2016,
    Es2017,
    Es2018,
    Es2019,
    Es2020,
    Es2021,
    Es2022,
    Es2023,
    Latest,
}

impl Default for EcmaVersion {
    fn default() -> Self {
        EcmaVersion::Latest
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    Script,
    Module,
}

impl Default for SourceType {
    fn default() -> Self {
        SourceType::Script
    }
}

/// How to treat reserved words used as identifiers in non-strict code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowReserved {
    /// Relax reserved-word checks entirely in script mode.
    Allow,
    /// Apply the ordinary version/strict-mode-gated reserved-word rules.
    Disallow,
    /// Apply the reserved-word rules even where `Allow` would otherwise relax them
    /// (`allowReserved: "never"` in the distilled spec).
    Never,
}

impl Default for AllowReserved {
    fn default() -> Self {
        AllowReserved::Disallow
    }
}

/// The full set of knobs from spec §6.
#[derive(Debug, Clone, Copy)]
pub struct ParserOptions {
    pub ecma_version: EcmaVersion,
    pub source_type: SourceType,
    pub allow_reserved: AllowReserved,
    pub allow_return_outside_function: bool,
    pub allow_await_outside_function: bool,
    pub allow_import_export_everywhere: bool,
    pub allow_hashbang: bool,
    pub tolerant: bool,
    pub preserve_parens: bool,
    pub check_private_fields: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            ecma_version: EcmaVersion::default(),
            source_type: SourceType::default(),
            allow_reserved: AllowReserved::default(),
            allow_return_outside_function: false,
            allow_await_outside_function: false,
            allow_import_export_everywhere: false,
            allow_hashbang: true,
            tolerant: false,
            preserve_parens: false,
            check_private_fields: true,
        }
    }
}

impl ParserOptions {
    pub fn script() -> Self {
        Self {
            source_type: SourceType::Script,
            ..Default::default()
        }
    }

    pub fn module() -> Self {
        Self {
            source_type: SourceType::Module,
            ..Default::default()
        }
    }
}
