use error_stack::{Context, Report};

// figment errors are dissected so that we can tell why the
// configuration fails to load (from a file or environment vars)
pub trait FigmentErrorAttachable<T: Context> {
    fn attach_figment_error(self, err: figment::Error) -> Report<T>;
}

impl<T: Context> FigmentErrorAttachable<T> for Report<T> {
    fn attach_figment_error(self, e: figment::Error) -> Report<T> {
        let mut this = self;
        for error in e {
            this = this.attach_printable(error.kind.to_string());

            if let (Some(profile), Some(md)) = (&error.profile, &error.metadata) {
                if !error.path.is_empty() {
                    let key = md.interpolate(profile, &error.path);
                    this = this.attach_printable(format!("for key {key:?}"));
                }
            }

            if let Some(md) = &error.metadata {
                if let Some(source) = &md.source {
                    this = this.attach_printable(format!("in {source} {}", md.name));
                } else {
                    this = this.attach_printable(format!("in {}", md.name));
                }
            }
        }
        this
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ParseError};
    use figment::Jail;

    #[test]
    fn test_attaches_every_error() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("SCRIBE_DB_URL", "postgres://localhost/scribe");
            jail.set_env("SCRIBE_DB_POOL_SIZE", "not a number");

            let error = Config::figment().extract::<Config>().unwrap_err();
            let report = Report::new(ParseError).attach_figment_error(error);

            let rendered = format!("{report:?}").to_lowercase();
            assert!(rendered.contains("failed to load configuration"));
            assert!(rendered.contains("pool_size"));
            Ok(())
        });
    }
}
