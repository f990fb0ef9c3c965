//! The exported entry points and their registry.
//!
//! Every `vim_clang_*` symbol is declared once, in the table below, which
//! generates both the `extern "C"` function and its [`EntryPoint`] record.
//! Argument-taking exports share one signature:
//!
//! ```c
//! const char *vim_clang_xxx(const char *arguments);
//! ```
//!
//! `vim_clang_version` takes no argument.

use std::os::raw::c_char;

use super::exports;
use crate::query::{
    Deduction, ExtentTarget, ExtractionPolicy, Navigation, NodeFilter, Query, Relation,
    TypeRelation,
};

/// An exported symbol and the query it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPoint {
    /// Symbol name, e.g. `vim_clang_get_definition_at`.
    pub name: &'static str,
    /// The query behind it.
    pub query: Query,
}

impl EntryPoint {
    /// Runs the entry point the way the editor would, without the C
    /// boundary.
    pub fn call(&self, input: &str) -> String {
        self.query.run(input)
    }
}

/// Looks up an entry point by symbol name.
pub fn lookup(name: &str) -> Option<&'static EntryPoint> {
    ENTRY_POINTS.iter().find(|entry| entry.name == name)
}

macro_rules! entry_points {
    ($($name:ident => $query:expr,)*) => {
        /// Every exported entry point, in declaration order.
        pub static ENTRY_POINTS: &[EntryPoint] = &[
            EntryPoint {
                name: "vim_clang_version",
                query: Query::Version,
            },
            $(EntryPoint {
                name: stringify!($name),
                query: $query,
            },)*
        ];

        $(
            #[doc = concat!("Exported `", stringify!($name), "`.")]
            ///
            /// ## Safety
            /// `arguments` must be null or a NUL-terminated string. The
            /// returned pointer is valid until this function is called
            /// again on the same thread.
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn $name(arguments: *const c_char) -> *const c_char {
                // SAFETY: same contract as this function.
                unsafe { exports::call(stringify!($name), $query, arguments) }
            }
        )*
    };
}

/// Exported `vim_clang_version`: the libclang version string, empty when
/// libclang cannot be loaded.
#[unsafe(no_mangle)]
pub extern "C" fn vim_clang_version() -> *const c_char {
    exports::respond("vim_clang_version", Query::Version, "")
}

entry_points! {
    vim_clang_tokens => Query::Tokens,

    vim_clang_extract_all => Query::Extract(ExtractionPolicy::All, NodeFilter::All),
    vim_clang_extract_all_current_file => Query::Extract(ExtractionPolicy::CurrentFile, NodeFilter::All),
    vim_clang_extract_all_non_system_headers => Query::Extract(ExtractionPolicy::NonSystemHeaders, NodeFilter::All),
    vim_clang_extract_declarations => Query::Extract(ExtractionPolicy::All, NodeFilter::Declarations),
    vim_clang_extract_declarations_current_file => Query::Extract(ExtractionPolicy::CurrentFile, NodeFilter::Declarations),
    vim_clang_extract_declarations_non_system_headers => Query::Extract(ExtractionPolicy::NonSystemHeaders, NodeFilter::Declarations),
    vim_clang_extract_attributes => Query::Extract(ExtractionPolicy::All, NodeFilter::Attributes),
    vim_clang_extract_attributes_current_file => Query::Extract(ExtractionPolicy::CurrentFile, NodeFilter::Attributes),
    vim_clang_extract_attributes_non_system_headers => Query::Extract(ExtractionPolicy::NonSystemHeaders, NodeFilter::Attributes),
    vim_clang_extract_expressions => Query::Extract(ExtractionPolicy::All, NodeFilter::Expressions),
    vim_clang_extract_expressions_current_file => Query::Extract(ExtractionPolicy::CurrentFile, NodeFilter::Expressions),
    vim_clang_extract_expressions_non_system_headers => Query::Extract(ExtractionPolicy::NonSystemHeaders, NodeFilter::Expressions),
    vim_clang_extract_preprocessings => Query::Extract(ExtractionPolicy::All, NodeFilter::Preprocessings),
    vim_clang_extract_preprocessings_current_file => Query::Extract(ExtractionPolicy::CurrentFile, NodeFilter::Preprocessings),
    vim_clang_extract_preprocessings_non_system_headers => Query::Extract(ExtractionPolicy::NonSystemHeaders, NodeFilter::Preprocessings),
    vim_clang_extract_references => Query::Extract(ExtractionPolicy::All, NodeFilter::References),
    vim_clang_extract_references_current_file => Query::Extract(ExtractionPolicy::CurrentFile, NodeFilter::References),
    vim_clang_extract_references_non_system_headers => Query::Extract(ExtractionPolicy::NonSystemHeaders, NodeFilter::References),
    vim_clang_extract_statements => Query::Extract(ExtractionPolicy::All, NodeFilter::Statements),
    vim_clang_extract_statements_current_file => Query::Extract(ExtractionPolicy::CurrentFile, NodeFilter::Statements),
    vim_clang_extract_statements_non_system_headers => Query::Extract(ExtractionPolicy::NonSystemHeaders, NodeFilter::Statements),
    vim_clang_extract_translation_units => Query::Extract(ExtractionPolicy::All, NodeFilter::TranslationUnits),
    vim_clang_extract_translation_units_current_file => Query::Extract(ExtractionPolicy::CurrentFile, NodeFilter::TranslationUnits),
    vim_clang_extract_translation_units_non_system_headers => Query::Extract(ExtractionPolicy::NonSystemHeaders, NodeFilter::TranslationUnits),
    vim_clang_extract_definitions => Query::Extract(ExtractionPolicy::All, NodeFilter::Definitions),
    vim_clang_extract_definitions_current_file => Query::Extract(ExtractionPolicy::CurrentFile, NodeFilter::Definitions),
    vim_clang_extract_definitions_non_system_headers => Query::Extract(ExtractionPolicy::NonSystemHeaders, NodeFilter::Definitions),
    vim_clang_extract_virtual_member_functions => Query::Extract(ExtractionPolicy::All, NodeFilter::VirtualMemberFunctions),
    vim_clang_extract_virtual_member_functions_current_file => Query::Extract(ExtractionPolicy::CurrentFile, NodeFilter::VirtualMemberFunctions),
    vim_clang_extract_virtual_member_functions_non_system_headers => Query::Extract(ExtractionPolicy::NonSystemHeaders, NodeFilter::VirtualMemberFunctions),
    vim_clang_extract_pure_virtual_member_functions => Query::Extract(ExtractionPolicy::All, NodeFilter::PureVirtualMemberFunctions),
    vim_clang_extract_pure_virtual_member_functions_current_file => Query::Extract(ExtractionPolicy::CurrentFile, NodeFilter::PureVirtualMemberFunctions),
    vim_clang_extract_pure_virtual_member_functions_non_system_headers => Query::Extract(ExtractionPolicy::NonSystemHeaders, NodeFilter::PureVirtualMemberFunctions),
    vim_clang_extract_static_member_functions => Query::Extract(ExtractionPolicy::All, NodeFilter::StaticMemberFunctions),
    vim_clang_extract_static_member_functions_current_file => Query::Extract(ExtractionPolicy::CurrentFile, NodeFilter::StaticMemberFunctions),
    vim_clang_extract_static_member_functions_non_system_headers => Query::Extract(ExtractionPolicy::NonSystemHeaders, NodeFilter::StaticMemberFunctions),

    vim_clang_get_location_information => Query::LocationInformation,
    vim_clang_get_extent_of_node_at_specific_location => Query::Extent(ExtentTarget::Node),
    vim_clang_get_inner_definition_extent_at_specific_location => Query::Extent(ExtentTarget::InnerDefinition),
    vim_clang_get_expression_extent_at_specific_location => Query::Extent(ExtentTarget::Expression),
    vim_clang_get_statement_extent_at_specific_location => Query::Extent(ExtentTarget::Statement),
    vim_clang_get_class_extent_at_specific_location => Query::Extent(ExtentTarget::Class),
    vim_clang_get_function_extent_at_specific_location => Query::Extent(ExtentTarget::Function),
    vim_clang_get_parameter_extent_at_specific_location => Query::Extent(ExtentTarget::Parameter),
    vim_clang_get_namespace_extent_at_specific_location => Query::Extent(ExtentTarget::Namespace),
    vim_clang_get_all_extents_at => Query::AllExtents,

    vim_clang_get_definition_at => Query::Related(Relation::Definition),
    vim_clang_get_referenced_at => Query::Related(Relation::Referenced),
    vim_clang_get_declaration_at => Query::Related(Relation::Declaration),

    vim_clang_get_pointee_type_at => Query::TypeOf(TypeRelation::Pointee),
    vim_clang_get_canonical_type_at => Query::TypeOf(TypeRelation::Canonical),
    vim_clang_get_result_type_at => Query::TypeOf(TypeRelation::Result),
    vim_clang_get_class_type_of_member_pointer_at => Query::TypeOf(TypeRelation::ClassOfMemberPointer),

    vim_clang_deduce_var_decl_at => Query::Deduce(Deduction::VarDecl),
    vim_clang_deduce_func_decl_at => Query::Deduce(Deduction::FuncDecl),
    vim_clang_deduce_func_or_var_decl_at => Query::Deduce(Deduction::FuncOrVarDecl),
    vim_clang_get_type_with_deduction_at => Query::Deduce(Deduction::TypeAt),

    vim_clang_get_completion_at => Query::Completion,
    vim_clang_get_compile_commands => Query::CompileCommands,
    vim_clang_get_diagnostics => Query::Diagnostics,

    vim_clang_get_current_function_at => Query::Navigate(Navigation::CurrentFunction),
    vim_clang_get_full_name_at => Query::Navigate(Navigation::FullName),
    vim_clang_get_comment_at => Query::Navigate(Navigation::Comment),
    vim_clang_get_include_at => Query::Navigate(Navigation::Include),
    vim_clang_get_deduced_declaration_at => Query::Navigate(Navigation::DeducedDeclaration),
}
