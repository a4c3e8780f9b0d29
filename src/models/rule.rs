use crate::models::common::DeclKind;

/// Per-artifact validation and placement rules, selected explicitly by each migrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactRule {
    Entity,
    Repository,
    Service,
    RestEndpoint,
    Controller,
    Configuration,
}

impl ArtifactRule {
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactRule::Entity => "entity",
            ArtifactRule::Repository => "repository",
            ArtifactRule::Service => "service",
            ArtifactRule::RestEndpoint => "REST endpoint",
            ArtifactRule::Controller => "controller",
            ArtifactRule::Configuration => "configuration",
        }
    }

    /// Parse the CLI spelling of a rule
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "entity" | "model" => Some(ArtifactRule::Entity),
            "repository" | "repo" => Some(ArtifactRule::Repository),
            "service" => Some(ArtifactRule::Service),
            "rest" | "endpoint" => Some(ArtifactRule::RestEndpoint),
            "controller" => Some(ArtifactRule::Controller),
            "config" | "configuration" => Some(ArtifactRule::Configuration),
            _ => None,
        }
    }

    /// Declaration kinds a valid artifact of this rule may carry
    pub fn accepted_kinds(&self) -> &'static [DeclKind] {
        match self {
            ArtifactRule::Entity => &[DeclKind::Class, DeclKind::Enum],
            ArtifactRule::Repository => &[DeclKind::Interface],
            ArtifactRule::Service => &[DeclKind::Class, DeclKind::Interface],
            ArtifactRule::RestEndpoint | ArtifactRule::Controller | ArtifactRule::Configuration =>
                &[DeclKind::Class],
        }
    }

    /// Kind used when a stub has to be synthesized
    pub fn primary_kind(&self) -> DeclKind {
        self.accepted_kinds()[0]
    }

    pub fn package_suffix(&self) -> &'static str {
        match self {
            ArtifactRule::Entity => "model",
            ArtifactRule::Repository => "repository",
            ArtifactRule::Service => "service",
            ArtifactRule::RestEndpoint => "rest",
            ArtifactRule::Controller => "controller",
            ArtifactRule::Configuration => "config",
        }
    }

    pub fn default_package(&self, base_package: &str) -> String {
        format!("{}.{}", base_package, self.package_suffix())
    }

    /// Glob, relative to the source root, enumerating this rule's inputs
    pub fn source_glob(&self) -> &'static str {
        match self {
            ArtifactRule::Entity => "**/model/*.java",
            ArtifactRule::Repository => "**/data/*Repository.java",
            ArtifactRule::Service => "**/service/*.java",
            ArtifactRule::RestEndpoint => "**/rest/*.java",
            ArtifactRule::Controller => "**/controller/*.java",
            ArtifactRule::Configuration => "**/config/*.java",
        }
    }

    fn target_description(&self) -> &'static str {
        match self {
            ArtifactRule::Entity => "Spring Boot JPA entity",
            ArtifactRule::Repository => "Spring Data JPA repository interface",
            ArtifactRule::Service => "Spring Boot service",
            ArtifactRule::RestEndpoint => "Spring Boot @RestController",
            ArtifactRule::Controller => "Spring MVC controller",
            ArtifactRule::Configuration => "Spring Boot @Configuration class",
        }
    }

    fn conversion_steps(&self) -> &'static str {
        match self {
            ArtifactRule::Entity =>
                "1. Update imports to Spring Boot equivalents\n\
                 2. Keep all validation annotations\n\
                 3. Use Spring Data JPA annotations\n\
                 4. Keep the same fields, logic and behaviour",
            ArtifactRule::Repository =>
                "1. Declare a Spring Data JPA repository interface extending JpaRepository\n\
                 2. Keep the same query methods\n\
                 3. Use query derivation or @Query annotations\n\
                 4. Match the parent interface's method signatures, including return types",
            ArtifactRule::Service =>
                "1. Replace EJB annotations with @Service and @Transactional\n\
                 2. Use constructor injection\n\
                 3. Keep the same business logic\n\
                 4. Replace JBoss-specific APIs with Spring equivalents",
            ArtifactRule::RestEndpoint =>
                "1. Replace JAX-RS annotations with Spring MVC annotations\n\
                 2. Keep the same API paths and behaviour\n\
                 3. Use Spring dependency injection\n\
                 4. Keep the same validation and error handling",
            ArtifactRule::Controller =>
                "1. Replace JSF-specific code with Spring MVC\n\
                 2. Keep the same behaviour\n\
                 3. Use Spring's model attributes, forms and redirects",
            ArtifactRule::Configuration =>
                "1. Use @Configuration and @Bean\n\
                 2. Keep the configuration minimal and compilable",
        }
    }

    /// System instructions shared by every generation call for this rule
    pub fn system_instructions(&self) -> String {
        let kind = self.primary_kind();
        let mut text = format!(
            "You are a Java code generation assistant. Output ONLY the complete Java code with no \
             additional text, explanations, or markdown formatting.\n\
             IMPORTANT:\n\
             1. The public {kind} name MUST match the file name (without .java extension)\n\
             2. Include only ONE public {kind} per file\n\
             3. Do not include comments at the beginning or end\n\
             4. All Java files must start with a package declaration\n\
             5. All required imports must be included\n"
        );
        match self {
            ArtifactRule::Repository => {
                text.push_str(
                    "6. Method signatures in child interfaces must match parent interfaces (including return types)\n"
                );
            }
            _ => {
                text.push_str(
                    "6. Test classes MUST use JUnit 5 imports and assertions and belong to the test source folder\n"
                );
            }
        }
        text
    }

    /// First-attempt prompt for migrating one legacy source file
    pub fn migration_prompt(&self, source: &str, type_name: &str, is_test: bool) -> String {
        if is_test {
            return format!(
                "Migrate this JBoss EAP {label} test to a Spring Boot test:\n\n\
                 ```java\n{source}\n```\n\n\
                 Make these changes:\n\
                 1. Update imports to JUnit 5 and Spring Boot testing equivalents\n\
                 2. Use org.junit.jupiter.api.Assertions for assertions\n\
                 3. The class name must be {type_name} to match the file name\n\
                 4. This test belongs in the TEST source directory\n\n\
                 Only respond with the complete migrated Java code, no explanations.",
                label = self.label()
            );
        }

        format!(
            "Migrate this JBoss EAP {label} to a {target}:\n\n\
             ```java\n{source}\n```\n\n\
             Make these changes:\n{steps}\n\n\
             The {kind} name must be {type_name} to match the file name.\n\
             Only respond with the complete migrated Java code, no explanations.",
            label = self.label(),
            target = self.target_description(),
            steps = self.conversion_steps(),
            kind = self.primary_kind()
        )
    }

    /// Escalated prompt used after a generated artifact failed validation
    pub fn strict_prompt(&self, source: &str, type_name: &str) -> String {
        format!(
            "IMPORTANT: You MUST output ONLY valid Java code for a {target}.\n\n\
             Original JBoss source to migrate:\n\
             ```java\n{source}\n```\n\n\
             Requirements:\n\
             1. Start with the package declaration\n\
             2. Include all necessary imports\n\
             3. The public {kind} MUST be named: {type_name}\n\
             4. Declare exactly one public top-level {kind}\n\
             5. Only return valid, compilable Java code\n\
             6. DO NOT include any explanatory text\n\n\
             ONLY respond with the complete Java code.",
            target = self.target_description(),
            kind = self.primary_kind()
        )
    }

    /// Prompt for phase-5 validation hardening of an already migrated file
    pub fn hardening_prompt(&self, migrated: &str) -> Option<String> {
        let steps = match self {
            ArtifactRule::Entity =>
                "1. Ensure all fields have appropriate Bean Validation annotations\n\
                 2. Add custom validation messages where missing\n\
                 3. Keep all existing functionality",
            ArtifactRule::Controller =>
                "1. Add @Valid to appropriate method parameters\n\
                 2. Add a BindingResult parameter for validation errors\n\
                 3. Handle validation errors properly\n\
                 4. Keep all existing functionality",
            _ => {
                return None;
            }
        };

        Some(
            format!(
                "Enhance validation in this Spring Boot {label}:\n\n\
                 ```java\n{migrated}\n```\n\n\
                 Make these changes:\n{steps}\n\n\
                 Only respond with the complete updated Java code, no explanations.",
                label = self.label()
            )
        )
    }
}
