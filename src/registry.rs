//! # Parser Registry
//!
//! Maps sentence identifiers such as `GPGGA` to a decoder, the record it writes and an
//! optional [`Callout`]. Entries are type-erased so that one registry can hold records
//! of different types; the typed [`Handle`] returned at registration reads them back.

use std::{
    any::Any,
    fmt,
    marker::PhantomData,
    sync::atomic::{AtomicUsize, Ordering},
};

use log::debug;

use crate::{
    IResult,
    error::{DecodeError, RegistryError},
};

/// Maximum length of a sentence identifier (talker id and sentence type).
pub const MAX_SENTENCE_ID_LENGTH: usize = 8;

/// Default number of parsers a registry can hold.
pub const DEFAULT_MAX_PARSERS: usize = 8;

/// A sentence identifier, e.g. `GPGGA` or `PGRME`.
pub type SentenceId = heapless::String<MAX_SENTENCE_ID_LENGTH>;

/// A verified sentence, split into its identifier and fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    id: &'a str,
    fields: &'a str,
    checksum: Option<u8>,
}

impl<'a> Sentence<'a> {
    /// Splits a payload at its first comma.
    ///
    /// ```rust
    /// use nmea0183_stream::Sentence;
    ///
    /// let sentence = Sentence::split("GPGSV,3,2,12,01,40,083,45", Some(0x44));
    /// assert_eq!(sentence.id(), "GPGSV");
    /// assert_eq!(sentence.fields(), "3,2,12,01,40,083,45");
    /// ```
    pub fn split(payload: &'a str, checksum: Option<u8>) -> Self {
        let (id, fields) = payload.split_once(',').unwrap_or((payload, ""));

        Sentence {
            id,
            fields,
            checksum,
        }
    }

    /// The sentence identifier, everything before the first comma.
    pub fn id(&self) -> &'a str {
        self.id
    }

    /// The comma-delimited fields following the identifier.
    pub fn fields(&self) -> &'a str {
        self.fields
    }

    /// The transmitted checksum, [`None`] if the sentence had none.
    pub fn checksum(&self) -> Option<u8> {
        self.checksum
    }
}

/// Tags each registry so that ids from one context never match another.
static NEXT_REGISTRY: AtomicUsize = AtomicUsize::new(0);

/// A registered parser within its [`Context`](crate::Context).
///
/// Ids issued by different contexts never compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParserId {
    registry: usize,
    index: usize,
}

impl ParserId {
    /// Registration order, starting at zero.
    pub fn index(self) -> usize {
        self.index
    }
}

/// Typed reference to a registered parser and its record.
pub struct Handle<T> {
    id: ParserId,
    _record: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// The untyped id reported in [`Status::Completed`](crate::Status::Completed).
    pub fn id(&self) -> ParserId {
        self.id
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.id.index).finish()
    }
}

impl<T> PartialEq<ParserId> for Handle<T> {
    fn eq(&self, other: &ParserId) -> bool {
        self.id == *other
    }
}

/// Decodes the fields of one sentence type into a record.
///
/// Implemented for every function with the shape of
/// [`Parsable::parser`](crate::nmea_content::Parsable::parser). The decoder receives the
/// fields with the identifier stripped and must consume all of them.
pub trait Decoder<T> {
    /// Decodes `fields` into a new record.
    fn decode<'a>(&mut self, fields: &'a str) -> IResult<&'a str, T>;
}

impl<T, F> Decoder<T> for F
where
    F: for<'a> FnMut(&'a str) -> IResult<&'a str, T>,
{
    fn decode<'a>(&mut self, fields: &'a str) -> IResult<&'a str, T> {
        self(fields)
    }
}

/// Receives every record its parser decodes successfully.
///
/// Closures taking `(&Sentence, &T, &mut U)` implement this trait.
///
/// A callout does not receive the [`Context`](crate::Context) itself, which is
/// mutably borrowed while it dispatches. It gets the parts a callback needs instead:
/// the verified [`Sentence`], the record just written and the context's user data.
pub trait Callout<T, U> {
    /// Called after `record` was updated from `sentence`.
    fn callout(&mut self, sentence: &Sentence<'_>, record: &T, user_data: &mut U);
}

impl<T, U, F> Callout<T, U> for F
where
    F: FnMut(&Sentence<'_>, &T, &mut U),
{
    fn callout(&mut self, sentence: &Sentence<'_>, record: &T, user_data: &mut U) {
        self(sentence, record, user_data)
    }
}

trait Dispatch<U> {
    fn id(&self) -> &str;

    fn dispatch(&mut self, sentence: &Sentence<'_>, user_data: &mut U) -> Result<(), DecodeError>;

    fn record(&self) -> &dyn Any;
}

struct Entry<T, D, U> {
    id: SentenceId,
    decoder: D,
    record: T,
    callout: Option<Box<dyn Callout<T, U>>>,
}

impl<T, D, U> Dispatch<U> for Entry<T, D, U>
where
    T: 'static,
    D: Decoder<T>,
{
    fn id(&self) -> &str {
        &self.id
    }

    fn dispatch(&mut self, sentence: &Sentence<'_>, user_data: &mut U) -> Result<(), DecodeError> {
        let fields = sentence.fields();

        let record = match self.decoder.decode(fields) {
            Ok(("", record)) => record,
            Ok((rest, _)) => {
                return Err(DecodeError::TrailingData {
                    position: fields.len() - rest.len(),
                });
            }
            Err(nom::Err::Incomplete(_)) => return Err(DecodeError::Incomplete),
            Err(nom::Err::Error(e) | nom::Err::Failure(e)) => {
                return Err(DecodeError::from_parse_error(fields, e));
            }
        };

        self.record = record;

        if let Some(callout) = self.callout.as_mut() {
            callout.callout(sentence, &self.record, user_data);
        }

        Ok(())
    }

    fn record(&self) -> &dyn Any {
        &self.record
    }
}

/// Result of looking up and decoding one sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// The parser decoded the sentence and its callout, if any, ran.
    Decoded(ParserId),
    /// The parser rejected the fields; its record is unchanged.
    Failed(ParserId, DecodeError),
    /// No parser is registered for this identifier.
    Unknown(String),
}

/// Fixed-capacity table of sentence parsers.
pub struct Registry<U> {
    tag: usize,
    entries: Vec<Box<dyn Dispatch<U>>>,
    capacity: usize,
}

impl<U> fmt::Debug for Registry<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("ids", &self.entries.iter().map(|e| e.id()).collect::<Vec<_>>())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl<U: 'static> Registry<U> {
    /// Creates an empty registry that accepts at most `capacity` parsers.
    pub fn with_capacity(capacity: usize) -> Self {
        Registry {
            tag: NEXT_REGISTRY.fetch_add(1, Ordering::Relaxed),
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Number of registered parsers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if no parser is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of parsers.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// `true` if a parser is registered for `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Identifier a parser was registered under.
    pub fn sentence_id(&self, parser: ParserId) -> Option<&str> {
        self.entry(parser).map(|entry| entry.id())
    }

    /// Registers `decoder` for sentences identified by `id`.
    ///
    /// `record` is the initial value of the record, visible through the returned
    /// [`Handle`] until the first sentence decodes.
    pub fn insert<T, D>(
        &mut self,
        id: &str,
        decoder: D,
        callout: Option<Box<dyn Callout<T, U>>>,
        record: T,
    ) -> Result<Handle<T>, RegistryError>
    where
        T: 'static,
        D: Decoder<T> + 'static,
    {
        let id = validate_id(id)?;

        if self.contains(&id) {
            return Err(RegistryError::Duplicate(id));
        }

        if self.entries.len() >= self.capacity {
            return Err(RegistryError::Full {
                capacity: self.capacity,
            });
        }

        debug!("registered parser for {id}");

        let parser = self.parser_id(self.entries.len());
        self.entries.push(Box::new(Entry {
            id,
            decoder,
            record,
            callout,
        }));

        Ok(Handle {
            id: parser,
            _record: PhantomData,
        })
    }

    /// Reads the record of a registered parser.
    ///
    /// Returns [`None`] for a handle issued by another registry.
    pub fn record<T: 'static>(&self, handle: Handle<T>) -> Option<&T> {
        self.entry(handle.id)
            .and_then(|entry| entry.record().downcast_ref())
    }

    /// Decodes `sentence` with the parser registered for its identifier.
    pub fn dispatch(&mut self, sentence: &Sentence<'_>, user_data: &mut U) -> Dispatched {
        let Some(index) = self.position(sentence.id()) else {
            return Dispatched::Unknown(sentence.id().to_owned());
        };

        let parser = self.parser_id(index);
        match self.entries[index].dispatch(sentence, user_data) {
            Ok(()) => Dispatched::Decoded(parser),
            Err(error) => Dispatched::Failed(parser, error),
        }
    }

    fn parser_id(&self, index: usize) -> ParserId {
        ParserId {
            registry: self.tag,
            index,
        }
    }

    fn entry(&self, parser: ParserId) -> Option<&dyn Dispatch<U>> {
        if parser.registry != self.tag {
            return None;
        }

        self.entries.get(parser.index).map(|entry| &**entry)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id() == id)
    }
}

fn to_sentence_id(id: &str) -> Option<SentenceId> {
    let mut sentence_id = SentenceId::new();
    sentence_id.push_str(id).ok()?;
    Some(sentence_id)
}

fn validate_id(id: &str) -> Result<SentenceId, RegistryError> {
    let printable = id
        .bytes()
        .all(|byte| byte.is_ascii_graphic() && !matches!(byte, b',' | b'*' | b'$'));

    match to_sentence_id(id) {
        Some(sentence_id) if printable && !id.is_empty() => Ok(sentence_id),
        _ => Err(RegistryError::InvalidId(id.to_owned())),
    }
}
