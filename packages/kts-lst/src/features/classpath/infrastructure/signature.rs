//! JVM descriptor and generic signature parsing
//!
//! Plain descriptors (`(Ljava/lang/String;)V`) are a subset of the generic
//! signature grammar, so one parser handles both.

use super::class_reader::ClassParseError;
use crate::features::classpath::domain::JvmType;

/// Parsed method signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodShape {
    pub parameters: Vec<JvmType>,
    pub return_type: JvmType,
}

/// Parsed class signature: superclass first, then interfaces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassShape {
    pub supertypes: Vec<JvmType>,
}

pub fn parse_field_type(descriptor: &str) -> Result<JvmType, ClassParseError> {
    let mut parser = SignatureParser::new(descriptor);
    let ty = parser.parse_type()?;
    parser.finish()?;
    Ok(ty)
}

pub fn parse_method(descriptor: &str) -> Result<MethodShape, ClassParseError> {
    let mut parser = SignatureParser::new(descriptor);
    parser.skip_type_parameters()?;
    parser.expect(b'(')?;
    let mut parameters = Vec::new();
    while parser.peek()? != b')' {
        parameters.push(parser.parse_type()?);
    }
    parser.expect(b')')?;
    let return_type = if parser.peek()? == b'V' {
        parser.pos += 1;
        JvmType::Void
    } else {
        parser.parse_type()?
    };
    // throws clauses carry nothing we match on
    while parser.remaining() > 0 && parser.peek()? == b'^' {
        parser.pos += 1;
        parser.parse_type()?;
    }
    parser.finish()?;
    Ok(MethodShape {
        parameters,
        return_type,
    })
}

pub fn parse_class(signature: &str) -> Result<ClassShape, ClassParseError> {
    let mut parser = SignatureParser::new(signature);
    parser.skip_type_parameters()?;
    let mut supertypes = Vec::new();
    while parser.remaining() > 0 {
        supertypes.push(parser.parse_type()?);
    }
    Ok(ClassShape { supertypes })
}

/// Internal binary name (`a/b/C$D`) to qualified name (`a.b.C$D`)
pub fn binary_to_qualified(name: &str) -> String {
    name.replace('/', ".")
}

struct SignatureParser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> SignatureParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    fn invalid(&self) -> ClassParseError {
        ClassParseError::InvalidDescriptor(self.text.to_string())
    }

    fn peek(&self) -> Result<u8, ClassParseError> {
        self.bytes.get(self.pos).copied().ok_or_else(|| self.invalid())
    }

    fn expect(&mut self, byte: u8) -> Result<(), ClassParseError> {
        if self.peek()? != byte {
            return Err(self.invalid());
        }
        self.pos += 1;
        Ok(())
    }

    fn finish(&self) -> Result<(), ClassParseError> {
        if self.remaining() != 0 {
            return Err(self.invalid());
        }
        Ok(())
    }

    fn read_until(&mut self, stops: &[u8]) -> Result<&'a str, ClassParseError> {
        let start = self.pos;
        while self.pos < self.bytes.len() && !stops.contains(&self.bytes[self.pos]) {
            self.pos += 1;
        }
        if self.pos >= self.bytes.len() {
            return Err(self.invalid());
        }
        let text = self.text;
        Ok(&text[start..self.pos])
    }

    /// `<T:Ljava/lang/Object;U::Ljava/lang/Runnable;>`
    fn skip_type_parameters(&mut self) -> Result<(), ClassParseError> {
        if self.remaining() == 0 || self.peek()? != b'<' {
            return Ok(());
        }
        self.pos += 1;
        while self.peek()? != b'>' {
            self.read_until(b":")?;
            // class bound is empty when only interface bounds follow
            self.expect(b':')?;
            if !matches!(self.peek()?, b':' | b'>') {
                self.parse_type()?;
            }
            while self.peek()? == b':' {
                self.pos += 1;
                self.parse_type()?;
            }
        }
        self.pos += 1;
        Ok(())
    }

    fn parse_type(&mut self) -> Result<JvmType, ClassParseError> {
        let tag = self.peek()?;
        let primitive = match tag {
            b'B' => Some("byte"),
            b'C' => Some("char"),
            b'D' => Some("double"),
            b'F' => Some("float"),
            b'I' => Some("int"),
            b'J' => Some("long"),
            b'S' => Some("short"),
            b'Z' => Some("boolean"),
            _ => None,
        };
        if let Some(name) = primitive {
            self.pos += 1;
            return Ok(JvmType::Primitive(name.to_string()));
        }
        match tag {
            b'L' => self.parse_class_type(),
            b'T' => {
                self.pos += 1;
                let name = self.read_until(b";")?.to_string();
                self.pos += 1;
                Ok(JvmType::TypeVar(name))
            }
            b'[' => {
                self.pos += 1;
                Ok(JvmType::Array(Box::new(self.parse_type()?)))
            }
            _ => Err(self.invalid()),
        }
    }

    /// `Lpkg/Outer<TArgs;>.Inner<TArgs;>;`
    fn parse_class_type(&mut self) -> Result<JvmType, ClassParseError> {
        self.expect(b'L')?;
        let mut name = binary_to_qualified(self.read_until(b";<.")?);
        let mut args = Vec::new();
        loop {
            match self.peek()? {
                b'<' => args = self.parse_type_arguments()?,
                b'.' => {
                    self.pos += 1;
                    let inner = self.read_until(b";<.")?;
                    name.push('$');
                    name.push_str(inner);
                    args.clear();
                }
                b';' => {
                    self.pos += 1;
                    return Ok(JvmType::Class { name, args });
                }
                _ => return Err(self.invalid()),
            }
        }
    }

    fn parse_type_arguments(&mut self) -> Result<Vec<JvmType>, ClassParseError> {
        self.expect(b'<')?;
        let mut args = Vec::new();
        while self.peek()? != b'>' {
            let arg = match self.peek()? {
                b'*' => {
                    self.pos += 1;
                    JvmType::Wildcard {
                        upper: None,
                        lower: None,
                    }
                }
                b'+' => {
                    self.pos += 1;
                    JvmType::Wildcard {
                        upper: Some(Box::new(self.parse_type()?)),
                        lower: None,
                    }
                }
                b'-' => {
                    self.pos += 1;
                    JvmType::Wildcard {
                        upper: None,
                        lower: Some(Box::new(self.parse_type()?)),
                    }
                }
                _ => self.parse_type()?,
            };
            args.push(arg);
        }
        self.pos += 1;
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_method_descriptor() {
        let shape = parse_method("(Ljava/lang/String;[I)Lorg/gradle/plugin/use/PluginDependencySpec;").unwrap();
        assert_eq!(
            shape.parameters,
            vec![
                JvmType::class("java.lang.String"),
                JvmType::Array(Box::new(JvmType::Primitive("int".into()))),
            ]
        );
        assert_eq!(shape.return_type, JvmType::class("org.gradle.plugin.use.PluginDependencySpec"));
    }

    #[test]
    fn test_void_return() {
        let shape = parse_method("()V").unwrap();
        assert!(shape.parameters.is_empty());
        assert_eq!(shape.return_type, JvmType::Void);
    }

    #[test]
    fn test_generic_method_signature() {
        let shape = parse_method(
            "(Lkotlin/jvm/functions/Function1<-Lorg/gradle/plugin/use/PluginDependenciesSpec;Lkotlin/Unit;>;)V",
        )
        .unwrap();
        let param = &shape.parameters[0];
        assert_eq!(param.qualified_name(), Some("kotlin.jvm.functions.Function1"));
        assert_eq!(
            param.args()[0].without_variance(),
            &JvmType::class("org.gradle.plugin.use.PluginDependenciesSpec")
        );
        assert_eq!(param.args()[1], JvmType::class("kotlin.Unit"));
    }

    #[test]
    fn test_method_type_parameters_and_throws() {
        let shape = parse_method("<T:Ljava/lang/Object;>(TT;)TT;^Ljava/io/IOException;").unwrap();
        assert_eq!(shape.parameters, vec![JvmType::TypeVar("T".into())]);
        assert_eq!(shape.return_type, JvmType::TypeVar("T".into()));
    }

    #[test]
    fn test_interface_only_bound() {
        let shape = parse_class("<T::Ljava/lang/Comparable<TT;>;>Ljava/lang/Object;").unwrap();
        assert_eq!(shape.supertypes, vec![JvmType::class("java.lang.Object")]);
    }

    #[test]
    fn test_class_signature_with_interfaces() {
        let shape = parse_class(
            "Ljava/lang/Object;Lorg/gradle/api/NamedDomainObjectContainer<Lorg/gradle/api/Task;>;",
        )
        .unwrap();
        assert_eq!(shape.supertypes.len(), 2);
        assert_eq!(
            shape.supertypes[1].qualified_name(),
            Some("org.gradle.api.NamedDomainObjectContainer")
        );
    }

    #[test]
    fn test_inner_class_type() {
        let ty = parse_field_type("Ljava/util/Map<TK;TV;>.Entry<TK;TV;>;").unwrap();
        assert_eq!(ty.qualified_name(), Some("java.util.Map$Entry"));
        assert_eq!(ty.args().len(), 2);
    }

    #[test]
    fn test_malformed_descriptor() {
        assert!(parse_field_type("Ljava/lang/String").is_err());
        assert!(parse_method("(Q)V").is_err());
        assert!(parse_field_type("II").is_err());
    }
}
