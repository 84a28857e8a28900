use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::hex::coords::HexPoint;
use crate::hex::sets::Bitset;
use crate::utils::prelude::*;

use super::transposition::DfsData;

/// One persisted record: `(hash, win, num_moves, best_move, num_states,
/// proof_len, proof_words...)`, all little-endian, fixed-width except the
/// trailing proof payload.
struct Record {
    hash: u64,
    data: DfsData,
    proof: Option<Bitset>,
}

fn write_record<W: Write>(w: &mut W, record: &Record) -> Result<()> {
    w.write_all(&record.hash.to_le_bytes())?;
    w.write_all(&[record.data.win as u8])?;
    w.write_all(&record.data.num_moves.to_le_bytes())?;
    w.write_all(&(record.data.best_move as u16).to_le_bytes())?;
    w.write_all(&record.data.num_states.to_le_bytes())?;
    match &record.proof {
        Some(proof) => {
            let words = proof.words();
            w.write_all(&(words.len() as u16).to_le_bytes())?;
            for word in words {
                w.write_all(&word.to_le_bytes())?;
            }
        }
        None => {
            w.write_all(&0u16.to_le_bytes())?;
        }
    }
    Ok(())
}

fn read_record<R: Read>(r: &mut R) -> Result<Option<Record>> {
    let mut hash_buf = [0u8; 8];
    match r.read_exact(&mut hash_buf) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }
    let hash = u64::from_le_bytes(hash_buf);

    let mut win_buf = [0u8; 1];
    r.read_exact(&mut win_buf)?;
    let win = win_buf[0] != 0;

    let mut u16_buf = [0u8; 2];
    r.read_exact(&mut u16_buf)?;
    let num_moves = u16::from_le_bytes(u16_buf);

    r.read_exact(&mut u16_buf)?;
    let best_move = u16::from_le_bytes(u16_buf) as HexPoint;

    let mut u64_buf = [0u8; 8];
    r.read_exact(&mut u64_buf)?;
    let num_states = u64::from_le_bytes(u64_buf);

    r.read_exact(&mut u16_buf)?;
    let proof_len = u16::from_le_bytes(u16_buf) as usize;
    let proof = if proof_len == 0 {
        None
    } else {
        let mut words = Vec::with_capacity(proof_len);
        for _ in 0..proof_len {
            r.read_exact(&mut u64_buf)?;
            words.push(u64::from_le_bytes(u64_buf));
        }
        Some(Bitset::from_words(&words))
    };

    Ok(Some(Record { hash, data: DfsData::new(win, num_moves, best_move, num_states), proof }))
}

/// A persistent, append-only store of solved positions, keyed by Zobrist
/// hash. Reads scan the whole file on open and build an in-memory index;
/// later duplicate hashes shadow earlier ones (append-only write, most
/// recent wins), exactly as `compact()` then makes durable on disk.
pub struct PositionDb {
    path: PathBuf,
    writer: BufWriter<File>,
    index: HashMap<u64, (DfsData, Option<Bitset>)>,
}

impl PositionDb {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<PositionDb> {
        let path = path.as_ref().to_path_buf();
        let mut index = HashMap::new();

        if path.exists() {
            let file = File::open(&path).with_context(|| format!("opening position db {path:?}"))?;
            let mut reader = BufReader::new(file);
            while let Some(record) = read_record(&mut reader)? {
                index.insert(record.hash, (record.data, record.proof));
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening position db {path:?} for append"))?;

        Ok(PositionDb { path, writer: BufWriter::new(file), index })
    }

    pub fn get(&self, hash: u64) -> Option<(DfsData, Option<Bitset>)> {
        self.index.get(&hash).copied()
    }

    pub fn put(&mut self, hash: u64, data: DfsData, proof: Option<Bitset>) -> Result<()> {
        write_record(&mut self.writer, &Record { hash, data, proof })?;
        self.writer.flush()?;
        self.index.insert(hash, (data, proof));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Rewrites the file keeping only the most recent record per hash,
    /// shrinking it back down after repeated overwrites of the same
    /// positions.
    pub fn compact(&mut self) -> Result<()> {
        let tmp_path = self.path.with_extension("compacting");
        {
            let tmp = File::create(&tmp_path).with_context(|| format!("creating {tmp_path:?}"))?;
            let mut writer = BufWriter::new(tmp);
            for (&hash, (data, proof)) in self.index.iter() {
                write_record(&mut writer, &Record { hash, data: *data, proof: *proof })?;
            }
            writer.flush()?;
        }
        std::fs::rename(&tmp_path, &self.path).with_context(|| format!("replacing {:?}", self.path))?;

        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("reopening {:?} for append", self.path))?;
        self.writer = BufWriter::new(file);
        Ok(())
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("hexsolve-test-{name}-{}.db", std::process::id()));
        p
    }

    #[test]
    fn put_then_get_round_trips() {
        let path = temp_path("roundtrip");
        let _ = std::fs::remove_file(&path);
        let mut db = PositionDb::open(&path).unwrap();
        let data = DfsData::new(true, 5, 10, 1000);
        let mut proof = Bitset::default();
        proof.insert(3);
        proof.insert(40);
        db.put(0xdead_beef, data, Some(proof)).unwrap();
        let (got_data, got_proof) = db.get(0xdead_beef).unwrap();
        assert_eq!(got_data, data);
        assert_eq!(got_proof, Some(proof));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn survives_reopen() {
        use crate::hex::sets::SetOps;
        let path = temp_path("reopen");
        let _ = std::fs::remove_file(&path);
        {
            let mut db = PositionDb::open(&path).unwrap();
            db.put(123, DfsData::new(false, 2, 4, 8), None).unwrap();
        }
        let db = PositionDb::open(&path).unwrap();
        let (data, proof) = db.get(123).unwrap();
        assert!(!data.win);
        assert!(proof.is_none());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn later_write_shadows_earlier_one() {
        let path = temp_path("shadow");
        let _ = std::fs::remove_file(&path);
        let mut db = PositionDb::open(&path).unwrap();
        db.put(5, DfsData::new(true, 1, 1, 1), None).unwrap();
        db.put(5, DfsData::new(false, 2, 2, 2), None).unwrap();
        let (data, _) = db.get(5).unwrap();
        assert!(!data.win);
        assert_eq!(db.len(), 1);
        db.compact().unwrap();
        let reopened = PositionDb::open(&path).unwrap();
        assert_eq!(reopened.len(), 1);
        let _ = std::fs::remove_file(&path);
    }
}
