//! Role Catalog: static job roles with their keyword lists and descriptions.

use serde::Serialize;

use crate::analysis::error::AnalysisError;

/// A target job role. Keywords are lowercase words or short phrases; they are
/// matched as substrings of the normalized resume.
#[derive(Debug, Clone, Serialize)]
pub struct RoleDefinition {
    pub id: &'static str,
    pub keywords: &'static [&'static str],
    pub description: &'static str,
}

impl RoleDefinition {
    /// The synthetic job document: all keywords joined by spaces, in list order.
    pub fn job_document(&self) -> String {
        self.keywords.join(" ")
    }
}

pub const BUILTIN_ROLES: &[RoleDefinition] = &[
    RoleDefinition {
        id: "Software Engineer",
        keywords: &[
            "python",
            "java",
            "javascript",
            "c++",
            "sql",
            "git",
            "docker",
            "kubernetes",
            "aws",
            "azure",
            "react",
            "node",
            "django",
            "flask",
            "api",
            "microservices",
        ],
        description: "Develops software applications and systems using various programming languages and technologies.",
    },
    RoleDefinition {
        id: "Data Scientist",
        keywords: &[
            "python",
            "r",
            "sql",
            "machine learning",
            "statistics",
            "pandas",
            "numpy",
            "tensorflow",
            "pytorch",
            "data visualization",
            "big data",
            "hadoop",
            "spark",
        ],
        description: "Analyzes complex data sets to extract insights and build predictive models.",
    },
    RoleDefinition {
        id: "Product Manager",
        keywords: &[
            "product strategy",
            "roadmap",
            "agile",
            "scrum",
            "user stories",
            "market research",
            "stakeholder management",
            "product launch",
            "metrics",
            "customer discovery",
        ],
        description: "Manages product development from conception to launch, working with cross-functional teams.",
    },
    RoleDefinition {
        id: "UX Designer",
        keywords: &[
            "user research",
            "wireframing",
            "prototyping",
            "figma",
            "sketch",
            "adobe xd",
            "usability testing",
            "user flows",
            "design thinking",
            "ui design",
        ],
        description: "Designs user interfaces and experiences for digital products.",
    },
    RoleDefinition {
        id: "Marketing Manager",
        keywords: &[
            "digital marketing",
            "seo",
            "sem",
            "social media",
            "content strategy",
            "campaign management",
            "analytics",
            "brand management",
            "market research",
            "email marketing",
        ],
        description: "Develops and implements marketing strategies to promote products or services.",
    },
];

/// Read-only handle over a role table. Copyable so it can sit in `AppState`.
#[derive(Debug, Clone, Copy)]
pub struct RoleCatalog {
    roles: &'static [RoleDefinition],
}

impl RoleCatalog {
    pub const fn new(roles: &'static [RoleDefinition]) -> Self {
        Self { roles }
    }

    pub const fn builtin() -> Self {
        Self::new(BUILTIN_ROLES)
    }

    pub fn roles(&self) -> &'static [RoleDefinition] {
        self.roles
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Looks up a role by its exact identifier.
    pub fn find(&self, id: &str) -> Result<&'static RoleDefinition, AnalysisError> {
        self.roles
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| AnalysisError::UnknownRole(id.to_string()))
    }
}

impl Default for RoleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
