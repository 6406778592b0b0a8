//! Backend that shells out to an external translator command.
//!
//! The command is configured as an argv list. `{source}` and `{target}` in
//! any argument are replaced with the locale tags; the source value is fed on
//! stdin and the trimmed stdout is taken as the translation.

use std::io::ErrorKind;
use std::process::Stdio;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::core::CatalogWrite;
use crate::core::store::CatalogStore;
use crate::translate::backend::{
    CompletionHandle, TranslationBackend, TranslationJob, TranslationOutcome, completion_pair,
};

pub struct CommandBackend {
    program: String,
    args: Vec<String>,
    store: Arc<dyn CatalogStore>,
}

impl CommandBackend {
    /// # Errors
    ///
    /// Returns error if `command` is empty.
    pub fn new(command: &[String], store: Arc<dyn CatalogStore>) -> Result<Self> {
        let Some((program, args)) = command.split_first() else {
            bail!(
                "No translator configured. Set \"translator\": {{\"command\": [...]}} in .keysyncrc.json"
            );
        };
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            store,
        })
    }

    fn argv_for(&self, job: &TranslationJob) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{source}", &job.source_locale)
                    .replace("{target}", job.target_locale())
            })
            .collect()
    }
}

impl TranslationBackend for CommandBackend {
    fn translate(&self, job: TranslationJob) -> CompletionHandle {
        let (mut sender, handle) = completion_pair(job.keypath(), job.target_locale());
        let program = self.program.clone();
        let args = self.argv_for(&job);
        let store = Arc::clone(&self.store);

        tokio::spawn(async move {
            // Dropping the work future kills the child before anything is written
            let result = tokio::select! {
                result = translate_and_store(&program, &args, &job, store.as_ref()) => result,
                () = sender.closed() => {
                    warn!(keypath = job.keypath(), locale = job.target_locale(), "completion handle dropped; translator abandoned");
                    return;
                }
            };
            let outcome = match result {
                Ok(value) => TranslationOutcome::Translated { value },
                Err(e) => {
                    warn!(keypath = job.keypath(), locale = job.target_locale(), error = %format!("{e:#}"), "translator failed");
                    TranslationOutcome::Failed {
                        reason: format!("{e:#}"),
                    }
                }
            };
            sender.complete(outcome);
        });

        handle
    }
}

async fn translate_and_store(
    program: &str,
    args: &[String],
    job: &TranslationJob,
    store: &dyn CatalogStore,
) -> Result<String> {
    let value = run_translator(program, args, &job.source_value).await?;
    debug!(keypath = job.keypath(), locale = job.target_locale(), "writing translation");
    store
        .write(vec![CatalogWrite::SetValue {
            keypath: job.record.keypath.clone(),
            locale: job.record.locale.clone(),
            value: value.clone(),
            file_path: job.record.file_path.clone(),
        }])
        .await?;
    Ok(value)
}

async fn run_translator(program: &str, args: &[String], input: &str) -> Result<String> {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    // Own process group: a terminal Ctrl-C must not reach the translator,
    // the in-flight pair is allowed to finish
    #[cfg(unix)]
    command.process_group(0);

    let mut child = command
        .spawn()
        .with_context(|| format!("Failed to start translator '{}'", program))?;

    if let Some(mut stdin) = child.stdin.take() {
        // A translator may exit without reading; its exit status says more
        if let Err(e) = stdin.write_all(input.as_bytes()).await
            && e.kind() != ErrorKind::BrokenPipe
        {
            return Err(e).context("Failed to write to translator stdin");
        }
    }

    let output = child
        .wait_with_output()
        .await
        .context("Failed to wait for translator")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("'{}' exited with {}: {}", program, output.status, stderr.trim());
    }

    let text = String::from_utf8(output.stdout).context("Translator output is not UTF-8")?;
    let text = text.trim();
    if text.is_empty() {
        bail!("'{}' produced no output", program);
    }
    Ok(text.to_string())
}
