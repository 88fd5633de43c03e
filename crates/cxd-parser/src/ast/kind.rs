//! Cursor and type kinds.
//!
//! Names render in the upper-snake spelling used throughout the context
//! record (`BINARY_OPERATOR`, `CALL_EXPR`, ...), so a record produced by one
//! provider reads the same as one produced by another.

use std::fmt;

// ---------------------------------------------------------------------------
// CursorKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorKind {
    TranslationUnit,

    // Declarations
    Namespace,
    UsingDirective,
    UsingDeclaration,
    TypedefDecl,
    TypeAliasDecl,
    TypeAliasTemplateDecl,
    StructDecl,
    ClassDecl,
    UnionDecl,
    EnumDecl,
    EnumConstantDecl,
    ClassTemplate,
    FunctionTemplate,
    TemplateTypeParameter,
    FunctionDecl,
    CxxMethod,
    Constructor,
    Destructor,
    VarDecl,
    ParmDecl,
    FieldDecl,
    CxxAccessSpecifier,

    // References
    TypeRef,
    TemplateRef,
    NamespaceRef,
    MemberRef,

    // Expressions
    DeclRefExpr,
    MemberRefExpr,
    CallExpr,
    BinaryOperator,
    CompoundAssignOperator,
    UnaryOperator,
    ConditionalOperator,
    ArraySubscriptExpr,
    ParenExpr,
    CStyleCastExpr,
    CxxFunctionalCastExpr,
    CxxStaticCastExpr,
    CxxDynamicCastExpr,
    CxxReinterpretCastExpr,
    CxxConstCastExpr,
    IntegerLiteral,
    FloatingLiteral,
    StringLiteral,
    CharacterLiteral,
    CxxBoolLiteralExpr,
    CxxNullPtrLiteralExpr,
    CxxThisExpr,
    CxxNewExpr,
    CxxDeleteExpr,
    LambdaExpr,
    InitListExpr,
    UnaryExpr,
    UnexposedExpr,

    // Statements
    CompoundStmt,
    DeclStmt,
    ReturnStmt,
    IfStmt,
    ForStmt,
    CxxForRangeStmt,
    WhileStmt,
    DoStmt,
    SwitchStmt,
    CaseStmt,
    DefaultStmt,
    BreakStmt,
    ContinueStmt,
    NullStmt,

    // Preprocessing
    InclusionDirective,
    MacroDefinition,
    MacroInstantiation,
    PreprocessingDirective,
}

impl CursorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TranslationUnit => "TRANSLATION_UNIT",
            Self::Namespace => "NAMESPACE",
            Self::UsingDirective => "USING_DIRECTIVE",
            Self::UsingDeclaration => "USING_DECLARATION",
            Self::TypedefDecl => "TYPEDEF_DECL",
            Self::TypeAliasDecl => "TYPE_ALIAS_DECL",
            Self::TypeAliasTemplateDecl => "TYPE_ALIAS_TEMPLATE_DECL",
            Self::StructDecl => "STRUCT_DECL",
            Self::ClassDecl => "CLASS_DECL",
            Self::UnionDecl => "UNION_DECL",
            Self::EnumDecl => "ENUM_DECL",
            Self::EnumConstantDecl => "ENUM_CONSTANT_DECL",
            Self::ClassTemplate => "CLASS_TEMPLATE",
            Self::FunctionTemplate => "FUNCTION_TEMPLATE",
            Self::TemplateTypeParameter => "TEMPLATE_TYPE_PARAMETER",
            Self::FunctionDecl => "FUNCTION_DECL",
            Self::CxxMethod => "CXX_METHOD",
            Self::Constructor => "CONSTRUCTOR",
            Self::Destructor => "DESTRUCTOR",
            Self::VarDecl => "VAR_DECL",
            Self::ParmDecl => "PARM_DECL",
            Self::FieldDecl => "FIELD_DECL",
            Self::CxxAccessSpecifier => "CXX_ACCESS_SPEC_DECL",
            Self::TypeRef => "TYPE_REF",
            Self::TemplateRef => "TEMPLATE_REF",
            Self::NamespaceRef => "NAMESPACE_REF",
            Self::MemberRef => "MEMBER_REF",
            Self::DeclRefExpr => "DECL_REF_EXPR",
            Self::MemberRefExpr => "MEMBER_REF_EXPR",
            Self::CallExpr => "CALL_EXPR",
            Self::BinaryOperator => "BINARY_OPERATOR",
            Self::CompoundAssignOperator => "COMPOUND_ASSIGNMENT_OPERATOR",
            Self::UnaryOperator => "UNARY_OPERATOR",
            Self::ConditionalOperator => "CONDITIONAL_OPERATOR",
            Self::ArraySubscriptExpr => "ARRAY_SUBSCRIPT_EXPR",
            Self::ParenExpr => "PAREN_EXPR",
            Self::CStyleCastExpr => "CSTYLE_CAST_EXPR",
            Self::CxxFunctionalCastExpr => "CXX_FUNCTIONAL_CAST_EXPR",
            Self::CxxStaticCastExpr => "CXX_STATIC_CAST_EXPR",
            Self::CxxDynamicCastExpr => "CXX_DYNAMIC_CAST_EXPR",
            Self::CxxReinterpretCastExpr => "CXX_REINTERPRET_CAST_EXPR",
            Self::CxxConstCastExpr => "CXX_CONST_CAST_EXPR",
            Self::IntegerLiteral => "INTEGER_LITERAL",
            Self::FloatingLiteral => "FLOATING_LITERAL",
            Self::StringLiteral => "STRING_LITERAL",
            Self::CharacterLiteral => "CHARACTER_LITERAL",
            Self::CxxBoolLiteralExpr => "CXX_BOOL_LITERAL_EXPR",
            Self::CxxNullPtrLiteralExpr => "CXX_NULL_PTR_LITERAL_EXPR",
            Self::CxxThisExpr => "CXX_THIS_EXPR",
            Self::CxxNewExpr => "CXX_NEW_EXPR",
            Self::CxxDeleteExpr => "CXX_DELETE_EXPR",
            Self::LambdaExpr => "LAMBDA_EXPR",
            Self::InitListExpr => "INIT_LIST_EXPR",
            Self::UnaryExpr => "CXX_UNARY_EXPR",
            Self::UnexposedExpr => "UNEXPOSED_EXPR",
            Self::CompoundStmt => "COMPOUND_STMT",
            Self::DeclStmt => "DECL_STMT",
            Self::ReturnStmt => "RETURN_STMT",
            Self::IfStmt => "IF_STMT",
            Self::ForStmt => "FOR_STMT",
            Self::CxxForRangeStmt => "CXX_FOR_RANGE_STMT",
            Self::WhileStmt => "WHILE_STMT",
            Self::DoStmt => "DO_STMT",
            Self::SwitchStmt => "SWITCH_STMT",
            Self::CaseStmt => "CASE_STMT",
            Self::DefaultStmt => "DEFAULT_STMT",
            Self::BreakStmt => "BREAK_STMT",
            Self::ContinueStmt => "CONTINUE_STMT",
            Self::NullStmt => "NULL_STMT",
            Self::InclusionDirective => "INCLUSION_DIRECTIVE",
            Self::MacroDefinition => "MACRO_DEFINITION",
            Self::MacroInstantiation => "MACRO_INSTANTIATION",
            Self::PreprocessingDirective => "PREPROCESSING_DIRECTIVE",
        }
    }

    #[must_use]
    pub const fn is_declaration(self) -> bool {
        matches!(
            self,
            Self::Namespace
                | Self::UsingDirective
                | Self::UsingDeclaration
                | Self::TypedefDecl
                | Self::TypeAliasDecl
                | Self::TypeAliasTemplateDecl
                | Self::StructDecl
                | Self::ClassDecl
                | Self::UnionDecl
                | Self::EnumDecl
                | Self::EnumConstantDecl
                | Self::ClassTemplate
                | Self::FunctionTemplate
                | Self::TemplateTypeParameter
                | Self::FunctionDecl
                | Self::CxxMethod
                | Self::Constructor
                | Self::Destructor
                | Self::VarDecl
                | Self::ParmDecl
                | Self::FieldDecl
                | Self::CxxAccessSpecifier
        )
    }

    #[must_use]
    pub const fn is_reference(self) -> bool {
        matches!(
            self,
            Self::TypeRef | Self::TemplateRef | Self::NamespaceRef | Self::MemberRef
        )
    }

    #[must_use]
    pub const fn is_expression(self) -> bool {
        matches!(
            self,
            Self::DeclRefExpr
                | Self::MemberRefExpr
                | Self::CallExpr
                | Self::BinaryOperator
                | Self::CompoundAssignOperator
                | Self::UnaryOperator
                | Self::ConditionalOperator
                | Self::ArraySubscriptExpr
                | Self::ParenExpr
                | Self::CStyleCastExpr
                | Self::CxxFunctionalCastExpr
                | Self::CxxStaticCastExpr
                | Self::CxxDynamicCastExpr
                | Self::CxxReinterpretCastExpr
                | Self::CxxConstCastExpr
                | Self::IntegerLiteral
                | Self::FloatingLiteral
                | Self::StringLiteral
                | Self::CharacterLiteral
                | Self::CxxBoolLiteralExpr
                | Self::CxxNullPtrLiteralExpr
                | Self::CxxThisExpr
                | Self::CxxNewExpr
                | Self::CxxDeleteExpr
                | Self::LambdaExpr
                | Self::InitListExpr
                | Self::UnaryExpr
                | Self::UnexposedExpr
        )
    }

    #[must_use]
    pub const fn is_statement(self) -> bool {
        matches!(
            self,
            Self::CompoundStmt
                | Self::DeclStmt
                | Self::ReturnStmt
                | Self::IfStmt
                | Self::ForStmt
                | Self::CxxForRangeStmt
                | Self::WhileStmt
                | Self::DoStmt
                | Self::SwitchStmt
                | Self::CaseStmt
                | Self::DefaultStmt
                | Self::BreakStmt
                | Self::ContinueStmt
                | Self::NullStmt
        )
    }

    #[must_use]
    pub const fn is_preprocessing(self) -> bool {
        matches!(
            self,
            Self::InclusionDirective
                | Self::MacroDefinition
                | Self::MacroInstantiation
                | Self::PreprocessingDirective
        )
    }

    /// Kinds the index keeps per line; these anchor most diagnostics.
    #[must_use]
    pub const fn is_interesting(self) -> bool {
        matches!(
            self,
            Self::BinaryOperator
                | Self::UnaryOperator
                | Self::CallExpr
                | Self::DeclRefExpr
                | Self::MemberRefExpr
                | Self::TypeRef
                | Self::ReturnStmt
                | Self::IfStmt
                | Self::ForStmt
                | Self::WhileStmt
                | Self::SwitchStmt
                | Self::VarDecl
                | Self::ParmDecl
                | Self::FieldDecl
                | Self::FunctionDecl
                | Self::CxxMethod
        )
    }

    #[must_use]
    pub const fn is_type_like(self) -> bool {
        matches!(
            self,
            Self::StructDecl | Self::ClassDecl | Self::UnionDecl | Self::EnumDecl | Self::ClassTemplate
        )
    }

    #[must_use]
    pub const fn is_variable_like(self) -> bool {
        matches!(self, Self::VarDecl | Self::ParmDecl | Self::FieldDecl)
    }

    #[must_use]
    pub const fn is_function_like(self) -> bool {
        matches!(
            self,
            Self::FunctionDecl
                | Self::CxxMethod
                | Self::Constructor
                | Self::Destructor
                | Self::FunctionTemplate
        )
    }

    #[must_use]
    pub const fn is_alias_decl(self) -> bool {
        matches!(self, Self::TypedefDecl | Self::TypeAliasDecl | Self::TypeAliasTemplateDecl)
    }
}

impl fmt::Display for CursorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TypeKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeKind {
    /// No type (statements, directives, unresolved names).
    #[default]
    Invalid,
    Void,
    Builtin,
    Pointer,
    LValueReference,
    RValueReference,
    ConstantArray,
    IncompleteArray,
    Record,
    Enum,
    Typedef,
    Auto,
    FunctionProto,
    Unexposed,
}

impl TypeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invalid => "Invalid",
            Self::Void => "Void",
            Self::Builtin => "Builtin",
            Self::Pointer => "Pointer",
            Self::LValueReference => "LValueReference",
            Self::RValueReference => "RValueReference",
            Self::ConstantArray => "ConstantArray",
            Self::IncompleteArray => "IncompleteArray",
            Self::Record => "Record",
            Self::Enum => "Enum",
            Self::Typedef => "Typedef",
            Self::Auto => "Auto",
            Self::FunctionProto => "FunctionProto",
            Self::Unexposed => "Unexposed",
        }
    }

    #[must_use]
    pub const fn is_pointer(self) -> bool {
        matches!(self, Self::Pointer)
    }

    #[must_use]
    pub const fn is_record(self) -> bool {
        matches!(self, Self::Record)
    }

    #[must_use]
    pub const fn is_valid(self) -> bool {
        !matches!(self, Self::Invalid)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interesting_kinds_are_exactly_sixteen() {
        let all = [
            CursorKind::BinaryOperator,
            CursorKind::UnaryOperator,
            CursorKind::CallExpr,
            CursorKind::DeclRefExpr,
            CursorKind::MemberRefExpr,
            CursorKind::TypeRef,
            CursorKind::ReturnStmt,
            CursorKind::IfStmt,
            CursorKind::ForStmt,
            CursorKind::WhileStmt,
            CursorKind::SwitchStmt,
            CursorKind::VarDecl,
            CursorKind::ParmDecl,
            CursorKind::FieldDecl,
            CursorKind::FunctionDecl,
            CursorKind::CxxMethod,
        ];
        assert!(all.iter().all(|k| k.is_interesting()));
        assert!(!CursorKind::CompoundStmt.is_interesting());
        assert!(!CursorKind::CompoundAssignOperator.is_interesting());
    }

    #[test]
    fn categories_do_not_overlap() {
        for kind in [
            CursorKind::VarDecl,
            CursorKind::CallExpr,
            CursorKind::ReturnStmt,
            CursorKind::MacroDefinition,
        ] {
            let hits = [
                kind.is_declaration(),
                kind.is_expression(),
                kind.is_statement(),
                kind.is_preprocessing(),
            ]
            .into_iter()
            .filter(|b| *b)
            .count();
            assert_eq!(hits, 1, "{kind}");
        }
    }

    #[test]
    fn type_kind_predicates() {
        assert!(TypeKind::Pointer.is_pointer());
        assert!(TypeKind::Record.is_record());
        assert!(!TypeKind::Invalid.is_valid());
        assert_eq!(TypeKind::default(), TypeKind::Invalid);
    }
}
