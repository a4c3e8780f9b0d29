use log::warn;

use crate::implementations::validator::parent_signature_reminder;
use crate::models::rule::ArtifactRule;

pub const STUB_NOTE: &str = "// STUB: automated migration failed for this file; complete it manually.";

/// Minimal artifact that always passes validation for `rule`.
///
/// Used once the generation loop has run out of retries; it cannot fail.
pub fn synthesize(type_name: &str, rule: ArtifactRule, package: &str) -> String {
    warn!("Synthesizing {} stub for {} in package {}", rule.label(), type_name, package);

    let package_clause = if package.is_empty() {
        String::new()
    } else {
        format!("package {};\n\n", package)
    };

    let body = match rule {
        ArtifactRule::Entity => entity_stub(type_name),
        ArtifactRule::Repository => repository_stub(type_name, package),
        ArtifactRule::Service => annotated_class_stub(type_name, "org.springframework.stereotype.Service", "Service"),
        ArtifactRule::RestEndpoint =>
            annotated_class_stub(
                type_name,
                "org.springframework.web.bind.annotation.RestController",
                "RestController"
            ),
        ArtifactRule::Controller =>
            annotated_class_stub(type_name, "org.springframework.stereotype.Controller", "Controller"),
        ArtifactRule::Configuration =>
            annotated_class_stub(
                type_name,
                "org.springframework.context.annotation.Configuration",
                "Configuration"
            ),
    };

    format!("{}{}", package_clause, body)
}

fn entity_stub(type_name: &str) -> String {
    format!(
        "import jakarta.persistence.Entity;\n\
         import jakarta.persistence.GeneratedValue;\n\
         import jakarta.persistence.Id;\n\
         \n\
         {STUB_NOTE}\n\
         @Entity\n\
         public class {type_name} {{\n\
         \n    @Id\n\
         \x20   @GeneratedValue\n\
         \x20   private Long id;\n\
         \n    public Long getId() {{\n\
         \x20       return id;\n\
         \x20   }}\n\
         \n    public void setId(Long id) {{\n\
         \x20       this.id = id;\n\
         \x20   }}\n\
         }}\n"
    )
}

fn repository_stub(type_name: &str, package: &str) -> String {
    let entity = match type_name.strip_suffix("Repository") {
        Some(stem) if !stem.is_empty() => stem,
        _ => "Member",
    };
    let model_package = match package.rsplit_once('.') {
        Some((parent, _)) => format!("{}.model", parent),
        None => "model".to_string(),
    };

    format!(
        "import {model_package}.{entity};\n\
         import org.springframework.data.jpa.repository.JpaRepository;\n\
         import org.springframework.stereotype.Repository;\n\
         \n\
         {STUB_NOTE}\n\
         @Repository\n\
         {reminder}\n\
         public interface {type_name} extends JpaRepository<{entity}, Long> {{\n\
         }}\n",
        reminder = parent_signature_reminder("JpaRepository")
    )
}

fn annotated_class_stub(type_name: &str, annotation_import: &str, annotation: &str) -> String {
    format!(
        "import {annotation_import};\n\
         \n\
         {STUB_NOTE}\n\
         @{annotation}\n\
         public class {type_name} {{\n\
         }}\n"
    )
}
