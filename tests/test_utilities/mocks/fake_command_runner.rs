use crate::test_utilities::fixtures::deb_bytes;
use async_trait::async_trait;
use deb_sbom::prelude::*;
use deb_sbom::shared::error::PipelineError;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Scripted stand-in for the packaging and scanning tools
///
/// - `apt-get download <pkg>` writes a real `.deb` for `<pkg>` into the
///   command's working directory
/// - `apt-rdepends <pkg>` prints the scripted dependency listing
/// - `trivy fs` / `trivy sbom` write their `--output` documents
/// - `clamscan` reports artifacts listed as infected
#[derive(Default, Clone)]
pub struct FakeCommandRunner {
    pub invocations: Arc<Mutex<Vec<CommandSpec>>>,
    dependency_listings: HashMap<String, String>,
    download_failures: Arc<Mutex<HashMap<String, usize>>>,
    scan_result: Option<String>,
    sbom_failures: HashSet<String>,
    infected: HashSet<String>,
    missing_programs: HashSet<String>,
}

impl FakeCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dependencies(mut self, package: &str, listing: &str) -> Self {
        self.dependency_listings
            .insert(package.to_string(), listing.to_string());
        self
    }

    /// The next `times` downloads of `package` exit with code 100
    pub fn failing_download(self, package: &str, times: usize) -> Self {
        self.download_failures
            .lock()
            .unwrap()
            .insert(package.to_string(), times);
        self
    }

    pub fn with_scan_result(mut self, document: String) -> Self {
        self.scan_result = Some(document);
        self
    }

    pub fn failing_sbom_for(mut self, file_name: &str) -> Self {
        self.sbom_failures.insert(file_name.to_string());
        self
    }

    pub fn infected(mut self, file_name: &str) -> Self {
        self.infected.insert(file_name.to_string());
        self
    }

    pub fn without_program(mut self, program: &str) -> Self {
        self.missing_programs.insert(program.to_string());
        self
    }

    pub fn invocations(&self) -> Vec<CommandSpec> {
        self.invocations.lock().unwrap().clone()
    }

    /// Invocations of `program`, with a `sudo` prefix stripped
    pub fn calls_to(&self, program: &str) -> Vec<Vec<String>> {
        self.invocations()
            .into_iter()
            .filter_map(|command| {
                if command.program == "sudo" {
                    let (first, rest) = command.args.split_first()?;
                    (first == program).then(|| rest.to_vec())
                } else {
                    (command.program == program).then_some(command.args)
                }
            })
            .collect()
    }

    fn ok(stdout: &str) -> ToolOutput {
        ToolOutput {
            exit_code: Some(0),
            stdout: stdout.to_string(),
            ..Default::default()
        }
    }

    fn exit(code: i32, stdout: &str, stderr: &str) -> ToolOutput {
        ToolOutput {
            exit_code: Some(code),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            timed_out: false,
        }
    }

    fn file_name(path: &str) -> String {
        Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn apt_get(&self, args: &[String], current_dir: Option<&PathBuf>) -> ToolOutput {
        match args.first().map(String::as_str) {
            Some("download") => {
                let spec = args.get(1).cloned().unwrap_or_default();
                {
                    let mut failures = self.download_failures.lock().unwrap();
                    if let Some(remaining) = failures.get_mut(&spec) {
                        if *remaining > 0 {
                            *remaining -= 1;
                            return Self::exit(100, "", "E: Failed to fetch");
                        }
                    }
                }
                let (name, version) = match spec.split_once('=') {
                    Some((name, version)) => (name.to_string(), version.to_string()),
                    None => (spec.clone(), "1.0-1".to_string()),
                };
                let dir = current_dir.cloned().unwrap_or_else(|| PathBuf::from("."));
                let file = dir.join(format!("{}_{}_amd64.deb", name, version));
                let copyright = format!("Files: *\nLicense: MIT\n Copyright {}\n", name);
                fs::write(
                    &file,
                    deb_bytes(
                        &name,
                        &version,
                        &format!("https://{}.example.test/", name),
                        Some(&copyright),
                    ),
                )
                .unwrap();
                Self::ok("")
            }
            _ => Self::ok(""),
        }
    }

    fn trivy(&self, args: &[String]) -> ToolOutput {
        let output = args.get(4).cloned().unwrap_or_default();
        let target = args.get(5).cloned().unwrap_or_default();
        match args.first().map(String::as_str) {
            Some("fs") => {
                if self.sbom_failures.contains(&Self::file_name(&target)) {
                    return Self::exit(1, "", "FATAL analyze error");
                }
                fs::write(&output, r#"{"bomFormat":"CycloneDX","specVersion":"1.5"}"#).unwrap();
                Self::ok("")
            }
            Some("sbom") => {
                let document = self
                    .scan_result
                    .clone()
                    .unwrap_or_else(|| r#"{"SchemaVersion":2,"Results":null}"#.to_string());
                fs::write(&output, document).unwrap();
                Self::ok("")
            }
            _ => Self::exit(2, "", "unknown subcommand"),
        }
    }

    fn clamscan(&self, args: &[String]) -> ToolOutput {
        let target = args.last().cloned().unwrap_or_default();
        if self.infected.contains(&Self::file_name(&target)) {
            Self::exit(1, &format!("{}: Eicar-Signature FOUND\n", target), "")
        } else {
            Self::ok(&format!("{}: OK\n", target))
        }
    }
}

#[async_trait]
impl CommandRunner for FakeCommandRunner {
    async fn invoke(&self, command: &CommandSpec) -> Result<ToolOutput> {
        self.invocations.lock().unwrap().push(command.clone());

        let (program, args) = if command.program == "sudo" {
            match command.args.split_first() {
                Some((program, args)) => (program.clone(), args.to_vec()),
                None => (command.program.clone(), Vec::new()),
            }
        } else {
            (command.program.clone(), command.args.clone())
        };

        if self.missing_programs.contains(&program) {
            return Err(PipelineError::ToolInvocation {
                program,
                details: "No such file or directory (os error 2)".to_string(),
            }
            .into());
        }

        let output = match program.as_str() {
            "apt-get" => self.apt_get(&args, command.current_dir.as_ref()),
            "apt-rdepends" => {
                let package = args.first().cloned().unwrap_or_default();
                let listing = self
                    .dependency_listings
                    .get(&package)
                    .cloned()
                    .unwrap_or_else(|| format!("{}\n", package));
                Self::ok(&listing)
            }
            "trivy" => self.trivy(&args),
            "clamscan" => self.clamscan(&args),
            "lsb_release" => Self::ok("bookworm\n"),
            _ => Self::ok(""),
        };
        Ok(output)
    }
}
