use std::fmt;

/// Kind of a top-level Java type declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Class,
    Interface,
    Enum,
    Unknown,
}

impl DeclKind {
    /// Parse the keyword that introduces a declaration
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "class" => DeclKind::Class,
            "interface" => DeclKind::Interface,
            "enum" => DeclKind::Enum,
            _ => DeclKind::Unknown,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            DeclKind::Class => "class",
            DeclKind::Interface => "interface",
            DeclKind::Enum => "enum",
            DeclKind::Unknown => "type",
        }
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// Which source root of the target project a file belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootTree {
    Main,
    Test,
}

impl RootTree {
    /// Path of the Java source root relative to the project root
    pub fn java_root(&self) -> &'static str {
        match self {
            RootTree::Main => "src/main/java",
            RootTree::Test => "src/test/java",
        }
    }
}

impl fmt::Display for RootTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RootTree::Main => write!(f, "main"),
            RootTree::Test => write!(f, "test"),
        }
    }
}
