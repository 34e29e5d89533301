/*
 * kts-lst - Lossless syntax trees for Gradle Kotlin build scripts
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (Span, Diagnostic, LstError, NodeId)
 * - config/      : ParserConfig, presets, YAML schema
 * - features/    : Vertical slices (classpath → parsing → lossless_tree → type_resolution)
 * - pipeline/    : Per-file pipeline and the GradleKtsParser facade
 *
 * Guarantees:
 * - An unedited tree prints back to the exact input bytes
 * - Unresolved names are marked, never fatal
 * - One resolver per classpath, shared across threads
 */

// Crate-level lint configuration
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::upper_case_acronyms)] // JVM/LST naming

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and utilities
pub mod shared;

/// Feature modules
pub mod features;

/// Pipeline orchestration
pub mod pipeline;

/// Configuration system
pub mod config;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{ParserConfig, Preset};
pub use features::classpath::{
    find_artifacts, ClasspathEntry, ClasspathResolver, Resolution, SymbolResolver, TypeDescriptor,
    TypeKind,
};
pub use features::lossless_tree::{print, print_to, LiteralKind, LstKind, TreeNode};
pub use features::parsing::{ScriptDefinition, ScriptKind};
pub use features::type_resolution::TypeRef;
pub use pipeline::{parse_and_attribute, GradleKtsParser, GradleKtsParserBuilder, ParseResult, SourceInput};
pub use shared::models::{Diagnostic, DiagnosticKind, ErrorKind, LstError, Result, Severity, Span};
pub use shared::NodeId;
