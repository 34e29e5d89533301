//! Test data builders
//!
//! Writes just enough of the class file format for the resolver to read:
//! constant pool, access flags, this/super/interfaces, and field and method
//! headers with optional `Signature` attributes.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const ACC_PUBLIC: u16 = 0x0001;
const ACC_INTERFACE: u16 = 0x0200;
const ACC_ABSTRACT: u16 = 0x0400;

struct Member {
    access: u16,
    name: String,
    descriptor: String,
    signature: Option<String>,
}

/// Builder for a single `.class` file
pub struct ClassFileBuilder {
    name: String,
    access: u16,
    super_class: Option<String>,
    interfaces: Vec<String>,
    fields: Vec<Member>,
    methods: Vec<Member>,
    raw_constants: Vec<Vec<u8>>,
}

impl ClassFileBuilder {
    /// Public class `qualified_name` extending `java.lang.Object`
    pub fn class(qualified_name: &str) -> Self {
        Self {
            name: qualified_name.to_string(),
            access: ACC_PUBLIC,
            super_class: Some("java.lang.Object".to_string()),
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            raw_constants: Vec::new(),
        }
    }

    pub fn interface(qualified_name: &str) -> Self {
        let mut builder = Self::class(qualified_name);
        builder.access = ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT;
        builder
    }

    pub fn extends(mut self, qualified_name: &str) -> Self {
        self.super_class = Some(qualified_name.to_string());
        self
    }

    pub fn implements(mut self, qualified_name: &str) -> Self {
        self.interfaces.push(qualified_name.to_string());
        self
    }

    pub fn field(mut self, name: &str, descriptor: &str) -> Self {
        self.fields.push(Member {
            access: ACC_PUBLIC,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: None,
        });
        self
    }

    pub fn method(mut self, name: &str, descriptor: &str) -> Self {
        self.methods.push(Member {
            access: ACC_PUBLIC | ACC_ABSTRACT,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: None,
        });
        self
    }

    /// Method with a generic `Signature` attribute
    pub fn generic_method(mut self, name: &str, descriptor: &str, signature: &str) -> Self {
        self.methods.push(Member {
            access: ACC_PUBLIC | ACC_ABSTRACT,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: Some(signature.to_string()),
        });
        self
    }

    /// Add a Kotlin `@Metadata`-style Utf8 constant: modified UTF-8 with an
    /// encoded NUL (`C0 80`) and a surrogate pair
    pub fn kotlin_metadata(mut self) -> Self {
        let mut d1 = vec![0xC0, 0x80];
        d1.extend_from_slice(b"\x04\x10\n");
        d1.extend_from_slice(&[0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80]);
        self.raw_constants.push(d1);
        self
    }

    /// Internal path of the class file: `a/b/C.class`
    pub fn file_name(&self) -> String {
        format!("{}.class", self.name.replace('.', "/"))
    }

    pub fn build(&self) -> Vec<u8> {
        let mut pool = Pool::default();
        let this_class = pool.class(&self.name);
        let super_class = self.super_class.as_deref().map(|s| pool.class(s)).unwrap_or(0);
        let interfaces: Vec<u16> = self.interfaces.iter().map(|i| pool.class(i)).collect();
        let signature_name = pool.utf8("Signature");
        let fields: Vec<[u16; 4]> = self.fields.iter().map(|m| pool.member(m)).collect();
        let methods: Vec<[u16; 4]> = self.methods.iter().map(|m| pool.member(m)).collect();
        for raw in &self.raw_constants {
            pool.raw_utf8(raw);
        }

        let mut out = vec![0xCA, 0xFE, 0xBA, 0xBE, 0, 0, 0, 52];
        out.extend_from_slice(&(pool.count + 1).to_be_bytes());
        out.extend_from_slice(&pool.bytes);
        out.extend_from_slice(&self.access.to_be_bytes());
        out.extend_from_slice(&this_class.to_be_bytes());
        out.extend_from_slice(&super_class.to_be_bytes());
        out.extend_from_slice(&(interfaces.len() as u16).to_be_bytes());
        for index in interfaces {
            out.extend_from_slice(&index.to_be_bytes());
        }
        write_members(&mut out, &fields, signature_name);
        write_members(&mut out, &methods, signature_name);
        out.extend_from_slice(&0u16.to_be_bytes()); // class attributes
        out
    }

    /// Write the class below a class directory root
    pub fn write_to_dir(&self, root: &Path) -> PathBuf {
        let path = root.join(self.file_name());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, self.build()).unwrap();
        path
    }
}

/// `[access, name, descriptor, signature]` pool indices; signature is 0
/// when absent
fn write_members(out: &mut Vec<u8>, indices: &[[u16; 4]], signature_name: u16) {
    out.extend_from_slice(&(indices.len() as u16).to_be_bytes());
    for [access, name, descriptor, signature] in indices {
        out.extend_from_slice(&access.to_be_bytes());
        out.extend_from_slice(&name.to_be_bytes());
        out.extend_from_slice(&descriptor.to_be_bytes());
        if *signature == 0 {
            out.extend_from_slice(&0u16.to_be_bytes());
        } else {
            out.extend_from_slice(&1u16.to_be_bytes());
            out.extend_from_slice(&signature_name.to_be_bytes());
            out.extend_from_slice(&2u32.to_be_bytes());
            out.extend_from_slice(&signature.to_be_bytes());
        }
    }
}

#[derive(Default)]
struct Pool {
    bytes: Vec<u8>,
    count: u16,
    utf8: Vec<(String, u16)>,
}

impl Pool {
    fn utf8(&mut self, value: &str) -> u16 {
        if let Some((_, index)) = self.utf8.iter().find(|(v, _)| v == value) {
            return *index;
        }
        self.bytes.push(1);
        self.bytes.extend_from_slice(&(value.len() as u16).to_be_bytes());
        self.bytes.extend_from_slice(value.as_bytes());
        self.count += 1;
        self.utf8.push((value.to_string(), self.count));
        self.count
    }

    /// Utf8 constant from already encoded bytes
    fn raw_utf8(&mut self, bytes: &[u8]) -> u16 {
        self.bytes.push(1);
        self.bytes.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
        self.bytes.extend_from_slice(bytes);
        self.count += 1;
        self.count
    }

    fn class(&mut self, qualified_name: &str) -> u16 {
        let name = self.utf8(&qualified_name.replace('.', "/"));
        self.bytes.push(7);
        self.bytes.extend_from_slice(&name.to_be_bytes());
        self.count += 1;
        self.count
    }

    fn member(&mut self, member: &Member) -> [u16; 4] {
        let name = self.utf8(&member.name);
        let descriptor = self.utf8(&member.descriptor);
        let signature = member.signature.as_deref().map(|s| self.utf8(s)).unwrap_or(0);
        [member.access, name, descriptor, signature]
    }
}

/// Write classes into a jar at `path`
pub fn write_jar(path: &Path, classes: &[ClassFileBuilder]) {
    let file = fs::File::create(path).unwrap();
    let mut jar = zip::ZipWriter::new(file);
    let options = zip::write::FileOptions::default();
    for class in classes {
        jar.start_file(class.file_name(), options).unwrap();
        jar.write_all(&class.build()).unwrap();
    }
    jar.finish().unwrap();
}

/// Write classes into a class directory rooted at `root`
pub fn write_class_dir(root: &Path, classes: &[ClassFileBuilder]) {
    for class in classes {
        class.write_to_dir(root);
    }
}
