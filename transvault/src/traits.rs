//! Traits shared by the translation file formats.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Cursor, Write},
    marker::PhantomData,
    path::Path,
};

use crate::{
    error::Error,
    types::{Catalogue, Messages},
};

/// Parsing and writing of one translation file.
///
/// # Example
///
/// ```rust,no_run
/// use transvault::traits::Parser;
/// let format = transvault::formats::yaml::Format::read_from("messages.en.yml")?;
/// format.write_to("messages.en.copy.yml")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(Error::Io)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Write to file path.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        self.to_writer(writer)
    }

    /// Parse from a string.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(s))
    }

    /// Parse from bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(bytes))
    }
}

/// Loads one translation file into a [`Catalogue`] for a given locale and domain.
///
/// The scanner picks a loader by the last segment of `<domain>.<locale>.<loader>` names.
pub trait CatalogueLoader {
    fn load(&self, path: &Path, locale: &str, domain: &str) -> Result<Catalogue, Error>;
}

/// [`CatalogueLoader`] for any [`Parser`] whose result flattens to [`Messages`].
pub struct FormatLoader<F> {
    _format: PhantomData<fn() -> F>,
}

impl<F> FormatLoader<F> {
    pub fn new() -> Self {
        Self {
            _format: PhantomData,
        }
    }
}

impl<F> Default for FormatLoader<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> std::fmt::Debug for FormatLoader<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatLoader")
            .field("format", &std::any::type_name::<F>())
            .finish()
    }
}

impl<F> CatalogueLoader for FormatLoader<F>
where
    F: Parser + Into<Messages>,
{
    fn load(&self, path: &Path, locale: &str, domain: &str) -> Result<Catalogue, Error> {
        let format = F::read_from(path)?;
        Ok(Catalogue::new(locale, domain)
            .with_messages(format.into())
            .with_resource(path))
    }
}
