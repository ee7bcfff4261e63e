//! Central location for model identifiers, endpoints, and workspace policy
//! constants so they never drift between modules.

/// Model identifiers, grouped by provider.
pub mod models {
    pub mod google {
        /// Capable tier used for answer generation (plain and streaming).
        pub const GEMINI_FLASH: &str = "gemini-2.0-flash";
        /// Fast tier used for query classification and file selection.
        pub const GEMINI_FLASH_8B: &str = "gemini-1.5-flash-8b";
    }
}

/// Provider endpoints.
pub mod urls {
    pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
}

/// Environment variable names.
pub mod env_vars {
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    /// Accepted as a fallback for backward compatibility with Google tooling.
    pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
}

/// Workspace enumeration policy.
pub mod workspace {
    /// Extensions eligible for context collection and candidate listing.
    pub const SUPPORTED_EXTENSIONS: &[&str] = &[
        "ts", "js", "tsx", "jsx", "html", "css", "scss", "less", "json", "md", "yaml", "yml",
        "xml", "java", "py", "kt", "kts", "go", "cpp", "c", "cs", "php", "rb", "swift", "rs",
    ];

    /// Dependency directory always excluded from enumeration.
    pub const DEPENDENCY_DIR: &str = "node_modules";
}

/// Presentation pacing and limits.
pub mod ui {
    /// Loading phase labels shown while a prompt turn is in flight.
    pub const PROMPT_PHASES: &[&str] = &[
        "Understanding the request",
        "Finding the solution",
        "Thinking",
        "Almost ready",
    ];

    /// Loading phase labels for the larger-context follow-up.
    pub const EXPANSION_PHASES: &[&str] = &[
        "Assessing additional context",
        "Fetching extra files",
        "Reanalyzing",
        "Almost there",
    ];

    /// Cap on file suggestions returned for a mention fragment.
    pub const MAX_FILE_SUGGESTIONS: usize = 10;
}
