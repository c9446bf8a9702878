//! SyntaxKind enum for all tokens and nodes in the Ruby CST.
//!
//! Following the rust-analyzer model, all tokens and nodes share a single enum.
//! Every byte in the source must appear as a token in the tree.

/// All syntax kinds for the Ruby CST.
///
/// This enum represents both tokens (lexer output) and composite nodes (parser output).
/// The `repr(u16)` ensures efficient storage in rowan's green tree.
///
/// We use SCREAMING_CASE following the rust-analyzer convention for SyntaxKind.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // === Trivia ===
    /// Horizontal whitespace (spaces, tabs)
    WHITESPACE,
    /// `\` immediately followed by a line ending
    LINE_CONTINUATION,
    /// `# ...` up to (not including) the line ending, or a whole
    /// `=begin`/`=end` block
    COMMENT,

    // === Tokens (lexer output) ===
    /// Line ending; significant as a statement terminator
    NEWLINE,
    /// Local variable or method name, `foo`, `empty?`, `save!`
    IDENT,
    /// Constant name, `Foo`
    CONSTANT,
    /// `@ivar`
    IVAR,
    /// `@@cvar`
    CVAR,
    /// `$gvar`
    GVAR,
    INTEGER,
    FLOAT,
    /// Single or double quoted string literal, quotes included
    STRING,
    /// String literal that runs into the end of the input
    UNTERMINATED_STRING,
    /// `:symbol`
    SYMBOL,

    DEF_KW,
    END_KW,
    CLASS_KW,
    MODULE_KW,
    IF_KW,
    ELSIF_KW,
    ELSE_KW,
    UNLESS_KW,
    WHILE_KW,
    UNTIL_KW,
    CASE_KW,
    WHEN_KW,
    DO_KW,
    THEN_KW,
    RETURN_KW,
    YIELD_KW,
    BEGIN_KW,
    RESCUE_KW,
    ENSURE_KW,
    SELF_KW,
    NIL_KW,
    TRUE_KW,
    FALSE_KW,
    AND_KW,
    OR_KW,
    NOT_KW,

    LPAREN,
    RPAREN,
    LBRACKET,
    RBRACKET,
    LBRACE,
    RBRACE,
    COMMA,
    DOT,
    /// `..`
    DOT2,
    /// `...`
    DOT3,
    /// `::`
    COLON2,
    COLON,
    SEMI,
    QUESTION,
    /// `=`
    EQ,
    /// `==`
    EQ2,
    /// `===`
    EQ3,
    /// `!=`
    NEQ,
    /// `=~`
    MATCH,
    /// `<=>`
    CMP,
    LT,
    GT,
    LTEQ,
    GTEQ,
    /// `<<`
    SHL,
    PLUS,
    MINUS,
    STAR,
    /// `**`
    POW,
    SLASH,
    PERCENT,
    BANG,
    /// `&&`
    AMP2,
    /// `||`
    PIPE2,
    AMP,
    PIPE,
    /// `=>`
    FAT_ARROW,
    /// `+=`, `-=`, `*=`, `/=`, `||=`, `&&=`
    OP_ASSIGN,
    /// A character the lexer does not recognise
    ERROR_TOKEN,
    /// End of file marker
    EOF,

    // === Composite Nodes (parser output) ===
    /// Root program node
    ROOT,
    /// `def name(params) ... end`
    DEF,
    PARAM_LIST,
    PARAM,
    /// `class Name < Super ... end`
    CLASS,
    /// `module Name ... end`
    MODULE,
    IF,
    ELSIF_CLAUSE,
    ELSE_CLAUSE,
    UNLESS,
    WHILE,
    UNTIL,
    CASE,
    WHEN_CLAUSE,
    /// `begin ... end`
    BEGIN,
    RESCUE_CLAUSE,
    ENSURE_CLAUSE,
    /// `stmt if cond`, `stmt rescue fallback` and friends
    MODIFIER,
    /// `do |x| ... end` or `{ |x| ... }`
    BLOCK,
    BLOCK_PARAMS,
    /// Method call, with or without receiver and parentheses
    CALL,
    ARG_LIST,
    /// `recv[index]`
    INDEX,
    ASSIGN,
    /// `a, b = 1, 2`
    MULTI_ASSIGN,
    /// Target list on the left of a multiple assignment
    MLHS,
    BINARY,
    UNARY,
    /// `cond ? a : b`
    TERNARY,
    ARRAY,
    HASH,
    /// `key => value` or `key: value`
    PAIR,
    PAREN,
    /// Numbers, strings, symbols, `nil`, `true`, `false`, `self`
    LITERAL,
    /// Variable or constant reference
    NAME_REF,
    /// `Foo::Bar`
    SCOPED_CONSTANT,
    RETURN,
    YIELD,

    /// Error recovery node
    ERROR,
}

impl SyntaxKind {
    /// Returns true if this kind represents a token (lexer output).
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::EOF as u16)
    }

    /// Returns true if this kind represents a composite node.
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Returns true if this kind is trivia the grammar never looks at.
    ///
    /// Newlines are not trivia: they terminate statements.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE | Self::LINE_CONTINUATION | Self::COMMENT
        )
    }

    /// Returns true for reserved words.
    pub fn is_keyword(self) -> bool {
        (Self::DEF_KW as u16..=Self::NOT_KW as u16).contains(&(self as u16))
    }

    /// Returns true for tokens that evaluate to a value on their own.
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::INTEGER
                | Self::FLOAT
                | Self::STRING
                | Self::SYMBOL
                | Self::NIL_KW
                | Self::TRUE_KW
                | Self::FALSE_KW
                | Self::SELF_KW
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language definition for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RubyLang {}

impl rowan::Language for RubyLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::ERROR as u16);
        // SAFETY: We check bounds above and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type alias for our syntax nodes.
pub type SyntaxNode = rowan::SyntaxNode<RubyLang>;
/// Type alias for our syntax tokens.
pub type SyntaxToken = rowan::SyntaxToken<RubyLang>;
/// Type alias for syntax elements (node or token).
pub type SyntaxElement = rowan::SyntaxElement<RubyLang>;
