//! Configuration
//!
//! Settings are loaded from `passgen.toml` (or `.passgen.toml`) in the
//! working directory, or from the file given with `--config`:
//!
//! ```toml
//! [templates]
//! dir = "templates"
//! foh = "foh_pass_template.docx"
//! boh = "boh_pass_template.docx"
//! load_unload = "load_unload_template.docx"
//!
//! [output]
//! dir = "output"
//! work_dir = ""            # empty: system temp dir
//! skip_blank_passes = true
//!
//! [export]
//! converters = ["soffice", "pandoc"]
//! timeout_secs = 120
//!
//! [access]
//! key_env = "PASSGEN_ACCESS_KEY"
//! ```
//!
//! The access key itself never lives in the file; only the name of the
//! environment variable holding it.

mod settings;


pub use settings::{
    AccessSettings, ExportSettings, OutputSettings, Settings, TemplateSettings, CONFIG_FILE_NAMES,
};
