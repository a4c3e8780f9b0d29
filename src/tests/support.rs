//! Scripted collaborators shared by the scenario tests.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use log::info;

use crate::config::MigrationOptions;
use crate::errors::{ MigrationError, MigrationResult };
use crate::implementations::config::MigrationConfig;
use crate::models::conversation::ChatMessage;
use crate::traits::oracle::{ OracleError, TextOracle };
use crate::traits::test_runner::{ TestRun, TestRunner };
use crate::traits::version_control::VersionControl;

pub const BASE_PACKAGE: &str = "org.jboss.as.quickstarts.kitchensink";

pub fn setup() {
    if env_logger::builder().is_test(true).try_init().is_ok() {
        info!("Logger initialized");
    }
}

type Responder = Box<dyn Fn(&[ChatMessage]) -> Result<String, OracleError> + Send + Sync>;

/// Oracle that answers from a queue, then from an optional responder
pub struct ScriptedOracle {
    replies: Mutex<VecDeque<Result<String, OracleError>>>,
    responder: Option<Responder>,
    conversations: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedOracle {
    pub fn new(replies: Vec<Result<String, OracleError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            responder: None,
            conversations: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(replies: &[&str]) -> Self {
        Self::new(
            replies
                .iter()
                .map(|r| Ok(r.to_string()))
                .collect()
        )
    }

    pub fn answering<F>(responder: F) -> Self
        where F: Fn(&[ChatMessage]) -> Result<String, OracleError> + Send + Sync + 'static
    {
        Self {
            replies: Mutex::new(VecDeque::new()),
            responder: Some(Box::new(responder)),
            conversations: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.conversations.lock().unwrap().len()
    }

    pub fn conversations(&self) -> Vec<Vec<ChatMessage>> {
        self.conversations.lock().unwrap().clone()
    }

    /// Text of the last user turn of every call
    pub fn prompts(&self) -> Vec<String> {
        self.conversations()
            .iter()
            .filter_map(|c| c.last().map(|m| m.content.clone()))
            .collect()
    }
}

#[async_trait]
impl TextOracle for ScriptedOracle {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, OracleError> {
        self.conversations.lock().unwrap().push(messages.to_vec());
        if let Some(reply) = self.replies.lock().unwrap().pop_front() {
            return reply;
        }
        match &self.responder {
            Some(responder) => responder(messages),
            None => Err(OracleError::ApiError("script exhausted".to_string())),
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

/// Test runner returning scripted verdicts; failing once the script runs out
pub struct ScriptedRunner {
    verdicts: Mutex<VecDeque<bool>>,
    runs: Mutex<usize>,
}

impl ScriptedRunner {
    pub fn new(verdicts: &[bool]) -> Self {
        Self {
            verdicts: Mutex::new(verdicts.iter().copied().collect()),
            runs: Mutex::new(0),
        }
    }

    pub fn always_passing() -> Self {
        Self::new(&[true; 32])
    }

    pub fn runs(&self) -> usize {
        *self.runs.lock().unwrap()
    }
}

#[async_trait]
impl TestRunner for ScriptedRunner {
    async fn run_tests(&self) -> TestRun {
        *self.runs.lock().unwrap() += 1;
        match self.verdicts.lock().unwrap().pop_front() {
            Some(true) => TestRun::passed("BUILD SUCCESS"),
            _ => TestRun::failed("BUILD FAILURE", "[ERROR] MemberRegistrationTest.testRegister failed"),
        }
    }
}

/// Version control that records calls instead of running git
#[derive(Default)]
pub struct RecordingVcs {
    events: Mutex<Vec<String>>,
    fail_checkpoints: bool,
}

impl RecordingVcs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_checkpoints() -> Self {
        Self { events: Mutex::new(Vec::new()), fail_checkpoints: true }
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn commits(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| e.strip_prefix("commit:").map(str::to_string))
            .collect()
    }
}

#[async_trait]
impl VersionControl for RecordingVcs {
    async fn init_repository(&self) -> MigrationResult<()> {
        self.events.lock().unwrap().push("init".to_string());
        Ok(())
    }

    async fn create_checkpoint(&self, name: &str) -> MigrationResult<()> {
        self.events.lock().unwrap().push(format!("checkpoint:{}", name));
        if self.fail_checkpoints {
            return Err(MigrationError::VersionControl(format!("branch {} already exists", name)));
        }
        Ok(())
    }

    async fn commit(&self, message: &str) -> MigrationResult<()> {
        self.events.lock().unwrap().push(format!("commit:{}", message));
        Ok(())
    }
}

/// Options over a temporary source/target pair with small budgets
pub fn options(source_root: &Path, target_root: &Path) -> MigrationOptions {
    let mut options = MigrationOptions::new(source_root, target_root, &MigrationConfig::default());
    options.gateway_attempts = 1;
    options.artifact_retries = 2;
    options.test_attempts = 3;
    options.comprehensive_after = 2;
    options
}

/// Path of `file_name` inside `package` under the given Java source root
pub fn java_path(root: &Path, tree: &str, package: &str, file_name: &str) -> std::path::PathBuf {
    let mut path = root.join("src").join(tree).join("java");
    for segment in package.split('.') {
        path.push(segment);
    }
    path.join(file_name)
}

pub fn write(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// A cut-down kitchensink: one entity, one repository and one JSF page
pub fn legacy_project(root: &Path) {
    write(
        &java_path(root, "main", &format!("{}.model", BASE_PACKAGE), "Member.java"),
        "package org.jboss.as.quickstarts.kitchensink.model;\n\n\
         import javax.persistence.Entity;\n\n\
         @Entity\npublic class Member implements Serializable {\n    @Id\n    private Long id;\n}\n"
    );
    write(
        &java_path(root, "main", &format!("{}.data", BASE_PACKAGE), "MemberRepository.java"),
        "package org.jboss.as.quickstarts.kitchensink.data;\n\n\
         @ApplicationScoped\npublic class MemberRepository {\n    @Inject\n    private EntityManager em;\n}\n"
    );
    write(&root.join("src/main/webapp/index.xhtml"), "<ui:composition template=\"/WEB-INF/templates/default.xhtml\"/>");
}

pub fn fenced(language: &str, body: &str) -> String {
    format!("```{}\n{}\n```", language, body)
}

pub fn member_entity() -> String {
    fenced(
        "java",
        "package org.jboss.as.quickstarts.kitchensink.model;\n\n\
         import jakarta.persistence.Entity;\n\n\
         @Entity\npublic class Member {\n    @Id\n    private Long id;\n}"
    )
}

pub fn member_repository() -> String {
    fenced(
        "java",
        "package org.jboss.as.quickstarts.kitchensink.data;\n\n\
         public interface MemberRepository extends JpaRepository<Member, Long> {\n}"
    )
}

pub fn config_class(name: &str) -> String {
    fenced(
        "java",
        &format!(
            "package org.jboss.as.quickstarts.kitchensink;\n\n@Configuration\npublic class {} {{\n}}",
            name
        )
    )
}

pub fn last_user_turn(messages: &[ChatMessage]) -> &str {
    messages
        .last()
        .map(|m| m.content.as_str())
        .unwrap_or("")
}

/// Answers every migration prompt of the pipeline with an acceptable artifact
pub fn cooperative_oracle() -> ScriptedOracle {
    ScriptedOracle::answering(|messages| {
        let prompt = last_user_turn(messages);
        let reply = if prompt.contains("pom.xml") {
            fenced("xml", "<project></project>")
        } else if prompt.contains("application.properties") {
            fenced("properties", "spring.datasource.url=jdbc:h2:mem:test")
        } else if prompt.contains("HTML") || prompt.contains("Thymeleaf") {
            fenced("html", "<html></html>")
        } else if prompt.contains("named TestDatabaseConfig") {
            config_class("TestDatabaseConfig")
        } else if prompt.contains("named TransactionConfig") {
            config_class("TransactionConfig")
        } else if prompt.contains("main application class") {
            config_class("KitchensinkApplication")
        } else if prompt.contains("repository") {
            member_repository()
        } else if prompt.contains("entity") {
            member_entity()
        } else {
            "I cannot provide this without seeing more context.".to_string()
        };
        Ok(reply)
    })
}
