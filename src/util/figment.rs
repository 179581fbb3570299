use error_stack::{Context, Report};

// Figment errors bury the offending key and source inside metadata;
// dissect them so a failed startup says which value was rejected.
pub trait FigmentErrorAttachable<T: Context> {
    fn attach_figment_error(self, err: figment::Error) -> Report<T>;
}

impl<T: Context> FigmentErrorAttachable<T> for Report<T> {
    fn attach_figment_error(self, e: figment::Error) -> Report<T> {
        let mut this = self.attach_printable(format!("{}", e.kind));

        if let (Some(profile), Some(md)) = (&e.profile, &e.metadata) {
            if !e.path.is_empty() {
                let key = md.interpolate(profile, &e.path);
                this = this.attach_printable(format!("for key {key:?}"));
            }
        }

        if let Some(md) = &e.metadata {
            match &md.source {
                Some(source) => {
                    this = this.attach_printable(format!("in {source} {}", md.name));
                }
                None => {
                    this = this.attach_printable(format!("in {}", md.name));
                }
            }
        }

        this
    }
}
