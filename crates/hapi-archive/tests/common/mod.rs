//! Synthetic archive builder for catalog tests.

#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};

pub const MAGIC: u32 = 0x49504148;
pub const BANK_MAGIC: u32 = 0x4B4E4142;
pub const VERSION_1: u32 = 0x0001_0000;
pub const VERSION_2: u32 = 0x0002_0000;
pub const HEADER_SIZE: usize = 20;

/// A node of the tree to lay out.
pub enum Node {
    Dir(&'static str, Vec<Node>),
    File(&'static str, Vec<u8>),
    Compressed(&'static str, u8, Vec<u8>),
    /// File whose name is raw single-byte text.
    RawFile(&'static [u8], Vec<u8>),
}

pub fn dir(name: &'static str, children: Vec<Node>) -> Node {
    Node::Dir(name, children)
}

pub fn file(name: &'static str, data: &[u8]) -> Node {
    Node::File(name, data.to_vec())
}

/// Archive bytes plus the plaintext location of every payload, in tree order.
pub struct Image {
    pub bytes: Vec<u8>,
    pub payloads: Vec<(usize, usize)>,
}

/// Lay out a plaintext archive, then scramble everything after the header.
pub fn build(key: u32, version: u32, root: Vec<Node>) -> Image {
    let mut buf = vec![0u8; HEADER_SIZE];
    let mut payloads = Vec::new();
    let root_offset = emit_dir(&mut buf, &root, &mut payloads);

    let mut header = Vec::with_capacity(HEADER_SIZE);
    for field in [MAGIC, BANK_MAGIC, root_offset, key, version] {
        header.write_u32::<LittleEndian>(field).unwrap();
    }
    buf[..HEADER_SIZE].copy_from_slice(&header);

    if key != 0 {
        scramble(key, HEADER_SIZE, &mut buf[HEADER_SIZE..]);
    }

    Image {
        bytes: buf,
        payloads,
    }
}

/// Reference cipher, written out independently of the crate.
pub fn scramble(key: u32, start: usize, data: &mut [u8]) {
    let mask = !((key << 2) | (key >> 6));
    for (i, byte) in data.iter_mut().enumerate() {
        let pos = (start + i) as u32;
        *byte = ((mask ^ pos) ^ !(*byte as u32)) as u8;
    }
}

fn emit_dir(buf: &mut Vec<u8>, children: &[Node], payloads: &mut Vec<(usize, usize)>) -> u32 {
    let mut descriptors = Vec::with_capacity(children.len());

    for child in children {
        let (name, data_offset, flag) = match child {
            Node::Dir(name, kids) => (name.as_bytes(), emit_dir(buf, kids, payloads), 1u8),
            Node::File(name, data) => (name.as_bytes(), emit_file(buf, 0, data, payloads), 0u8),
            Node::Compressed(name, tag, data) => {
                (name.as_bytes(), emit_file(buf, *tag, data, payloads), 0u8)
            }
            Node::RawFile(name, data) => (*name, emit_file(buf, 0, data, payloads), 0u8),
        };
        let name_offset = buf.len() as u32;
        buf.extend_from_slice(name);
        buf.push(0);
        descriptors.push((name_offset, data_offset, flag));
    }

    let list_offset = buf.len() as u32;
    for (name_offset, data_offset, flag) in descriptors {
        buf.write_u32::<LittleEndian>(name_offset).unwrap();
        buf.write_u32::<LittleEndian>(data_offset).unwrap();
        buf.write_u8(flag).unwrap();
    }

    let record_offset = buf.len() as u32;
    buf.write_u32::<LittleEndian>(children.len() as u32).unwrap();
    buf.write_u32::<LittleEndian>(list_offset).unwrap();
    record_offset
}

fn emit_file(buf: &mut Vec<u8>, tag: u8, data: &[u8], payloads: &mut Vec<(usize, usize)>) -> u32 {
    let payload_offset = buf.len();
    buf.extend_from_slice(data);
    payloads.push((payload_offset, data.len()));

    let record_offset = buf.len() as u32;
    buf.write_u32::<LittleEndian>(payload_offset as u32).unwrap();
    buf.write_u32::<LittleEndian>(data.len() as u32).unwrap();
    buf.write_u8(tag).unwrap();
    record_offset
}

/// Overwrite a little-endian u32 in plaintext layout terms, re-scrambling it.
pub fn patch_u32(image: &mut Image, key: u32, offset: usize, value: u32) {
    let mut bytes = value.to_le_bytes();
    if key != 0 && offset >= HEADER_SIZE {
        scramble(key, offset, &mut bytes);
    }
    image.bytes[offset..offset + 4].copy_from_slice(&bytes);
}
