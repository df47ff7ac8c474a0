//! Defining the diagnostics error codes.
//!
//! Codes in the `E00xx` range are emitted by the frontend (parsing and typing),
//! codes in the `E01xx` range by the ownership and linearity checker.

/// Unknown variable name.
pub const UNKNOWN_VAR_ERROR: &str = "E0001";
/// Unknown function name.
pub const UNKNOWN_FUN_ERROR: &str = "E0002";
/// Unknown type name.
pub const UNKNOWN_TYPE_ERROR: &str = "E0003";
/// Wrong number of arguments or type arguments.
pub const ARITY_ERROR: &str = "E0004";
/// No such field error.
pub const FIELD_ACCESS_ERROR: &str = "E0005";
/// Parser error.
pub const PARSER_ERROR: &str = "E0006";
/// Assignment to an immutable binding.
pub const IMMUTABLE_ASSIGN_ERROR: &str = "E0007";
/// Unknown enumeration case.
pub const UNKNOWN_CASE_ERROR: &str = "E0008";
/// Type mismatch between expected and found.
pub const TYPE_MISMATCH_ERROR: &str = "E0009";

/// Use of a binding after it was consumed.
pub const USE_AFTER_CONSUME_ERROR: &str = "E0101";
/// Whole-value use after a partial consumption.
pub const PARTIAL_USE_ERROR: &str = "E0102";
/// Consumed on some incoming paths but not on others.
pub const INCONSISTENT_MERGE_ERROR: &str = "E0103";
/// Conflicting accesses to the same storage.
pub const OVERLAPPING_ACCESS_ERROR: &str = "E0104";
/// Move-only or non-escapable type used in a generic position that forbids it.
pub const GENERIC_RESTRICTION_ERROR: &str = "E0105";
/// Jump with no valid target.
pub const STRUCTURAL_CONTROL_FLOW_ERROR: &str = "E0106";
/// Consumption of a borrowed binding.
pub const BORROWED_CONSUME_ERROR: &str = "E0107";
/// An `inout` parameter left uninitialized when the function returns.
pub const MISSING_REINIT_ERROR: &str = "E0108";
