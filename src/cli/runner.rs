use crate::{
    cli::{Cli, Commands, ListArgs, ReplaceArgs},
    config::Config,
    diagnostics::Diagnostics,
    error::{Error, Result},
    ioutils::{deep_copy, get_output_dir},
    placeholder::load_definitions,
    template::{Context, Listing, TemplateProcessor},
};
use std::io::Write;
use std::path::Path;

/// Main CLI runner that dispatches to the enumerate-only and materialize modes
pub struct Runner {
    cli: Cli,
}

impl Runner {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Executes the selected command, printing its report to `out`.
    ///
    /// # Returns
    /// * `Err(Error::CompletedWithErrors)` - If the run finished but errors were reported
    pub fn run_with_output<W: Write>(self, out: &mut W) -> Result<()> {
        let config = Config::new(self.cli.suffix.as_str())?;
        let diagnostics = Diagnostics::new();

        match &self.cli.command {
            Commands::List(args) => self.list(args, &config, &diagnostics, out)?,
            Commands::Replace(args) => self.replace(args, &config, &diagnostics)?,
        }

        self.finish(&diagnostics, out)
    }

    pub fn run(self) -> Result<()> {
        self.run_with_output(&mut std::io::stdout().lock())
    }

    /// Prints the referenced names, marking undeclared ones when definitions are given
    fn list<W: Write>(
        &self,
        args: &ListArgs,
        config: &Config,
        diagnostics: &Diagnostics,
        out: &mut W,
    ) -> Result<()> {
        let listing = Listing::scan(&args.directory, config, diagnostics)?;
        let definitions = match &args.definitions {
            Some(path) => Some(load_definitions(path, diagnostics)?),
            None => None,
        };

        for name in listing.names() {
            for path in listing.paths(name) {
                log::info!("\"{name}\" is referenced by '{}'", path.display());
            }
            match &definitions {
                Some(definitions) if !definitions.contains(name) => {
                    writeln!(out, "{name} (undeclared)")?
                }
                _ => writeln!(out, "{name}")?,
            }
        }

        if let Some(definitions) = &definitions {
            let unused = listing.unused(definitions);
            if !unused.is_empty() {
                writeln!(out, "Unused definitions:")?;
                for name in unused {
                    writeln!(out, "  {name}")?;
                }
            }
        }
        Ok(())
    }

    /// Materializes the templates, in place or into a copy
    fn replace(&self, args: &ReplaceArgs, config: &Config, diagnostics: &Diagnostics) -> Result<()> {
        let template_root = args.directory.as_path();
        if !template_root.exists() {
            return Err(Error::TemplateDoesNotExistsError {
                template_dir: template_root.display().to_string(),
            });
        }

        let definitions = load_definitions(&args.definitions, diagnostics)?;
        let processor = TemplateProcessor::new(&definitions, config, diagnostics);

        match &args.output_dir {
            Some(output_dir) => {
                let output_root = get_output_dir(output_dir, template_root, args.force)?;
                self.copy_template(template_root, &output_root)?;
                processor.process_dir_content(&output_root, &Context::new(), true)
            }
            None => processor.process_entry(template_root, &Context::new(), false),
        }
    }

    fn copy_template(&self, template_root: &Path, output_root: &Path) -> Result<()> {
        log::info!(
            "Copying '{}' to '{}'",
            template_root.display(),
            output_root.display()
        );
        deep_copy(template_root, output_root)
    }

    /// Prints the completion line and turns reported errors into the run result
    fn finish<W: Write>(&self, diagnostics: &Diagnostics, out: &mut W) -> Result<()> {
        let errors = diagnostics.error_count();
        let warnings = diagnostics.warning_count();
        let command = match self.cli.command {
            Commands::List(_) => "Listing",
            Commands::Replace(_) => "Template expansion",
        };
        writeln!(out, "{command} completed with {warnings} warning(s) and {errors} error(s).")?;

        if errors > 0 {
            return Err(Error::CompletedWithErrors { errors });
        }
        Ok(())
    }
}

/// Main entry point for CLI execution
pub fn run(cli: Cli) -> Result<()> {
    let runner = Runner::new(cli);
    runner.run()
}
