use std::fs;
use std::path::PathBuf;

use crate::error::{Error, IoResultExt, Result};
use crate::fs::write_atomic;
use crate::hash::{compute_id, ObjectId};
use crate::object::ObjectType;
use crate::repo::Repo;

/// separator between the type tag and the payload in an object file
const TAG_SEPARATOR: u8 = 0;

/// write an object to the store
///
/// the file holds `<type>\0<payload>` and is named by the digest of those
/// bytes. writing content that is already stored is a no-op returning the
/// same id.
pub fn put(repo: &Repo, payload: &[u8], object_type: ObjectType) -> Result<ObjectId> {
    let id = compute_id(object_type, payload);
    let path = object_path(repo, &id);

    // deduplication: if the object already exists, we're done
    if path.exists() {
        tracing::trace!(%id, %object_type, "object already stored");
        return Ok(id);
    }

    let mut bytes = Vec::with_capacity(object_type.as_str().len() + 1 + payload.len());
    bytes.extend_from_slice(object_type.as_str().as_bytes());
    bytes.push(TAG_SEPARATOR);
    bytes.extend_from_slice(payload);

    write_atomic(&repo.tmp_path(), &path, &bytes)?;
    tracing::debug!(%id, %object_type, size = payload.len(), "stored object");

    Ok(id)
}

/// read an object's payload, optionally asserting its type
pub fn get(repo: &Repo, id: &ObjectId, expected: Option<ObjectType>) -> Result<Vec<u8>> {
    let (actual, payload) = read_object(repo, id)?;

    if let Some(expected) = expected {
        if expected != actual {
            return Err(Error::TypeMismatch {
                id: *id,
                expected,
                actual,
            });
        }
    }

    Ok(payload)
}

/// read an object, returning its stored type and payload
///
/// the stored bytes are re-hashed and must match `id`.
pub fn read_object(repo: &Repo, id: &ObjectId) -> Result<(ObjectType, Vec<u8>)> {
    let path = object_path(repo, id);
    let mut bytes = fs::read(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::ObjectNotFound(*id)
        } else {
            Error::Io { path, source: e }
        }
    })?;

    let split = bytes
        .iter()
        .position(|&b| b == TAG_SEPARATOR)
        .ok_or(Error::MalformedObject(*id))?;

    let object_type = std::str::from_utf8(&bytes[..split])
        .map_err(|_| Error::InvalidObjectType(String::from_utf8_lossy(&bytes[..split]).into_owned()))?
        .parse::<ObjectType>()?;

    let payload = bytes.split_off(split + 1);

    // verify digest
    if compute_id(object_type, &payload) != *id {
        return Err(Error::CorruptObject(*id));
    }

    Ok((object_type, payload))
}

/// get the filesystem path to an object
pub fn object_path(repo: &Repo, id: &ObjectId) -> PathBuf {
    repo.objects_path().join(id.to_hex())
}

/// check if an object exists in the store
pub fn object_exists(repo: &Repo, id: &ObjectId) -> bool {
    object_path(repo, id).exists()
}

/// list the ids of every stored object, sorted
///
/// files whose names are not object ids are skipped.
pub fn list_objects(repo: &Repo) -> Result<Vec<ObjectId>> {
    let dir = repo.objects_path();
    let mut ids = Vec::new();

    for entry in fs::read_dir(&dir).with_path(&dir)? {
        let entry = entry.with_path(&dir)?;
        let name = entry.file_name();
        match name.to_str().map(ObjectId::from_hex) {
            Some(Ok(id)) => ids.push(id),
            _ => tracing::warn!(file = ?name, "ignoring stray file in object store"),
        }
    }

    ids.sort();
    Ok(ids)
}
