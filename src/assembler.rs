use crate::{
    chunks::{idat::IDATChunk, iend::IENDChunk, Chunk, ChunkType, WritableChunk, SIGNATURE},
    options::ChunkSelection,
};

/// Writes `chunks` back out as a PNG stream with the image data replaced by
/// `image_data`, which must already be compressed.
///
/// The new IDAT chunk takes the place of the first IDAT in `chunks`; any
/// further IDAT chunks are dropped. With [`ChunkSelection::Minimal`] only the
/// critical IHDR and IEND chunks are kept around it. An IEND chunk is added
/// if `chunks` doesn't end with one.
pub fn assemble<D: AsRef<[u8]>>(
    chunks: &[Chunk<D>],
    image_data: Vec<u8>,
    selection: ChunkSelection,
) -> Vec<u8> {
    let mut out = SIGNATURE.to_vec();
    let mut idat = Some(IDATChunk::new(image_data));
    let mut ended = false;
    for chunk in chunks {
        match chunk.chunk_type() {
            ChunkType::IDAT => {
                if let Some(idat) = idat.take() {
                    idat.into_chunk().write_to(&mut out);
                }
            }
            ChunkType::IEND => {
                if let Some(idat) = idat.take() {
                    idat.into_chunk().write_to(&mut out);
                }
                chunk.write_to(&mut out);
                ended = true;
                break;
            }
            ChunkType::IHDR => chunk.write_to(&mut out),
            _ if selection == ChunkSelection::PassThrough => chunk.write_to(&mut out),
            other => log::debug!("Leaving out {} chunk", other),
        }
    }
    if let Some(idat) = idat {
        idat.into_chunk().write_to(&mut out);
    }
    if !ended {
        IENDChunk.to_chunk().write_to(&mut out);
    }
    out
}
