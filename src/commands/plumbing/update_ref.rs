use crate::areas::refs::Refs;
use crate::areas::repository::Repository;
use anyhow::Context;

impl Repository {
    /// Point reference `name` at the object `revision` resolves to
    pub fn update_ref(&mut self, name: &str, revision: &str) -> anyhow::Result<()> {
        Refs::validate_name(name)?;
        let object_id = self.resolve_object(revision)?;

        self.refs()
            .write(name, &object_id)
            .with_context(|| format!("Unable to update {name}"))?;

        Ok(())
    }
}
