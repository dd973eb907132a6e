#[cfg(test)]
mod tests {
    use rstest::rstest;
    use wasmtext::parser;
    use wasmtext::parser::error::ParseError;
    use wasmtext::parser::module::{FunctionType, Import, Module, ValueType};
    use wasmtext::parser::reader::Reader;

    fn parse(bytes: Vec<u8>) -> Result<Module, ParseError> {
        parser::parse(&mut Reader::new(bytes))
    }

    /// Assemble a module from WAT source and decode the resulting binary.
    fn parse_wat(source: &str) -> Module {
        let bytes = wat::parse_str(source).expect("wat source should assemble");
        parse(bytes).expect("assembled module should decode")
    }

    /// Magic and version, the smallest valid module.
    fn header() -> Vec<u8> {
        vec![0x00, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00]
    }

    /// Frame `body` as a section. Only good for payloads under 128 bytes.
    fn section(id: u8, body: &[u8]) -> Vec<u8> {
        assert!(body.len() < 128);
        let mut out = vec![id, body.len() as u8];
        out.extend_from_slice(body);
        out
    }

    /// Length-prefixed name. Only good for names under 128 bytes.
    fn name(s: &str) -> Vec<u8> {
        assert!(s.len() < 128);
        let mut out = vec![s.len() as u8];
        out.extend_from_slice(s.as_bytes());
        out
    }

    // Framing ----------------------------------------------------------------

    #[test]
    fn empty_input_fails() {
        assert_eq!(parse(vec![]), Err(ParseError::UnexpectedEof { offset: 0 }));
    }

    #[test]
    fn magic_alone_fails() {
        assert_eq!(
            parse(vec![0x00, 0x61, 0x73, 0x6D]),
            Err(ParseError::UnexpectedEof { offset: 4 })
        );
    }

    #[test]
    fn wrong_magic_reports_offset_and_byte() {
        assert_eq!(
            parse(vec![0x00, 0x61, 0x73, 0x6E, 0x01, 0x00, 0x00, 0x00]),
            Err(ParseError::UnexpectedByte {
                expected: 0x6D,
                found: 0x6E,
                offset: 3
            })
        );
    }

    #[test]
    fn wrong_version_fails() {
        assert_eq!(
            parse(vec![0x00, 0x61, 0x73, 0x6D, 0x02, 0x00, 0x00, 0x00]),
            Err(ParseError::UnexpectedByte {
                expected: 0x01,
                found: 0x02,
                offset: 4
            })
        );
    }

    #[test]
    fn minimal_module() {
        let module = parse(header()).unwrap();
        assert_eq!(module.name, None);
        assert!(module.types.is_empty());
        assert!(module.imports.is_empty());
    }

    #[test]
    fn trailing_garbage_fails() {
        let mut bytes = header();
        bytes.push(0xFF);
        assert_eq!(
            parse(bytes),
            Err(ParseError::TrailingData {
                offset: 8,
                found: 0xFF
            })
        );
    }

    #[test]
    fn out_of_order_section_fails() {
        // a type section may not follow an import section
        let mut bytes = header();
        bytes.extend(section(2, &[0x00])); // empty import vector
        bytes.extend(section(1, &[0x00])); // empty type vector
        assert!(matches!(
            parse(bytes),
            Err(ParseError::TrailingData { found: 1, .. })
        ));
    }

    #[test]
    fn section_size_mismatch_fails() {
        // one functype () -> (), which occupies 4 bytes, declared as 3
        let mut bytes = header();
        bytes.extend([0x01, 0x03, 0x01, 0x60, 0x00, 0x00]);
        assert_eq!(
            parse(bytes),
            Err(ParseError::SectionSizeMismatch {
                id: 1,
                start: 10,
                end: 14,
                declared: 3,
                actual: 4
            })
        );
    }

    #[test]
    fn section_truncated_by_eof_fails() {
        let mut bytes = header();
        bytes.extend([0x01, 0x7F, 0x01, 0x60]); // declares 127 bytes, provides 2
        assert!(matches!(parse(bytes), Err(ParseError::UnexpectedEof { .. })));
    }

    // Custom sections --------------------------------------------------------

    #[test]
    fn module_with_name() {
        // name custom section carrying a module name subsection with "hello"
        let mut bytes = header();
        bytes.extend([0x00, 0x0D]);
        bytes.extend(name("name"));
        bytes.extend([0x00, 0x06]);
        bytes.extend(name("hello"));
        let module = parse(bytes).unwrap();
        assert_eq!(module.name.as_deref(), Some("hello"));
    }

    #[test]
    fn unknown_custom_section_is_skipped() {
        let mut body = name("vendor.metadata");
        body.extend([0xDE, 0xAD, 0xBE, 0xEF]);
        let mut bytes = header();
        bytes.extend(section(0, &body));
        let module = parse(bytes).unwrap();
        assert_eq!(module.name, None);
    }

    #[test]
    fn source_mapping_url_section() {
        let mut body = name("sourceMappingURL");
        body.extend(name("http://example.com/map"));
        let mut bytes = header();
        bytes.extend(section(0, &body));
        assert!(parse(bytes).is_ok());
    }

    #[test]
    fn custom_sections_between_known_sections() {
        let mut bytes = header();
        bytes.extend(section(0, &name("one")));
        bytes.extend(section(1, &[0x01, 0x60, 0x00, 0x00]));
        bytes.extend(section(0, &name("two")));
        bytes.extend(section(2, &[0x00]));
        bytes.extend(section(0, &name("three")));
        let module = parse(bytes).unwrap();
        assert_eq!(module.types.len(), 1);
        assert!(module.imports.is_empty());
    }

    #[test]
    fn name_section_subsections_are_consumed() {
        let mut body = name("name");
        // module name
        let module_name = name("m");
        body.push(0x00);
        body.push(module_name.len() as u8);
        body.extend(&module_name);
        // function names: [(0, "f")]
        let mut func_names = vec![0x01, 0x00];
        func_names.extend(name("f"));
        body.push(0x01);
        body.push(func_names.len() as u8);
        body.extend(&func_names);
        // local names: [(0, [(0, "x")])]
        let mut local_names = vec![0x01, 0x00, 0x01, 0x00];
        local_names.extend(name("x"));
        body.push(0x02);
        body.push(local_names.len() as u8);
        body.extend(&local_names);
        // global names: [(0, "g")]
        let mut global_names = vec![0x01, 0x00];
        global_names.extend(name("g"));
        body.push(0x07);
        body.push(global_names.len() as u8);
        body.extend(&global_names);
        // data segment names: [(0, "d")]
        let mut data_names = vec![0x01, 0x00];
        data_names.extend(name("d"));
        body.push(0x09);
        body.push(data_names.len() as u8);
        body.extend(&data_names);

        let mut bytes = header();
        bytes.extend(section(0, &body));
        let module = parse(bytes).unwrap();
        assert_eq!(module.name.as_deref(), Some("m"));
    }

    #[test]
    fn unknown_name_subsection_is_skipped() {
        let mut body = name("name");
        body.extend([0x04, 0x02, 0xAA, 0xBB]); // unknown subsection id 4
        let module_name = name("late");
        body.push(0x00);
        body.push(module_name.len() as u8);
        body.extend(&module_name);

        let mut bytes = header();
        bytes.extend(section(0, &body));
        let module = parse(bytes).unwrap();
        assert_eq!(module.name.as_deref(), Some("late"));
    }

    // Type and import sections ----------------------------------------------

    #[test]
    fn two_type_definitions() {
        let mut bytes = header();
        bytes.extend(section(
            1,
            &[
                0x02, // two types
                0x60, 0x03, 0x7F, 0x7E, 0x7B, 0x02, 0x7D, 0x7C, // (i32 i64 v128) -> (f32 f64)
                0x60, 0x00, 0x02, 0x70, 0x6F, // () -> (funcref externref)
            ],
        ));
        let module = parse(bytes).unwrap();
        assert_eq!(
            module.types,
            vec![
                FunctionType {
                    params: vec![ValueType::I32, ValueType::I64, ValueType::V128],
                    results: vec![ValueType::F32, ValueType::F64],
                },
                FunctionType {
                    params: vec![],
                    results: vec![ValueType::FuncRef, ValueType::ExternRef],
                },
            ]
        );
    }

    #[test]
    fn functype_without_marker_fails() {
        let mut bytes = header();
        bytes.extend(section(1, &[0x01, 0x61, 0x00, 0x00]));
        assert!(matches!(
            parse(bytes),
            Err(ParseError::UnexpectedByte {
                expected: 0x60,
                ..
            })
        ));
    }

    #[test]
    fn import_descriptors_of_every_kind() {
        let mut body = vec![0x05];
        // func with type index 0
        body.extend(name("env"));
        body.extend(name("f"));
        body.extend([0x00, 0x00]);
        // table: funcref, min 0
        body.extend(name("env"));
        body.extend(name("t"));
        body.extend([0x01, 0x70, 0x00, 0x00]);
        // memory: min 1, max 2
        body.extend(name("env"));
        body.extend(name("m"));
        body.extend([0x02, 0x01, 0x01, 0x02]);
        // global: const i32
        body.extend(name("env"));
        body.extend(name("g"));
        body.extend([0x03, 0x7F, 0x00]);
        // tag: attribute 0, type index 0
        body.extend(name("env"));
        body.extend(name("x"));
        body.extend([0x04, 0x00, 0x00]);

        let mut bytes = header();
        bytes.extend(section(1, &[0x01, 0x60, 0x00, 0x00]));
        bytes.extend(section(2, &body));
        let module = parse(bytes).unwrap();

        let expected: Vec<Import> = ["f", "t", "m", "g", "x"]
            .iter()
            .map(|n| Import {
                module: "env".to_string(),
                name: n.to_string(),
            })
            .collect();
        assert_eq!(module.imports, expected);
    }

    #[test]
    fn unknown_import_descriptor_fails() {
        let mut body = vec![0x01];
        body.extend(name("env"));
        body.extend(name("f"));
        body.push(0x05);
        let mut bytes = header();
        bytes.extend(section(2, &body));
        assert!(matches!(
            parse(bytes),
            Err(ParseError::UnknownTag {
                what: "importdesc type",
                found: 0x05,
                ..
            })
        ));
    }

    #[test]
    fn shared_memory_limits() {
        let mut bytes = header();
        bytes.extend(section(5, &[0x01, 0x03, 0x01, 0x01])); // shared, min 1 max 1
        assert!(parse(bytes).is_ok());

        let mut bytes = header();
        bytes.extend(section(5, &[0x01, 0x04, 0x01]));
        assert!(matches!(
            parse(bytes),
            Err(ParseError::UnknownTag {
                what: "limits flags",
                found: 0x04,
                ..
            })
        ));
    }

    #[test]
    fn tag_section_entries() {
        let mut bytes = header();
        bytes.extend(section(1, &[0x01, 0x60, 0x00, 0x00]));
        bytes.extend(section(13, &[0x02, 0x00, 0x00, 0x00, 0x00]));
        assert!(parse(bytes).is_ok());
    }

    #[test]
    fn element_discriminant_other_than_zero_fails() {
        let mut bytes = header();
        bytes.extend(section(9, &[0x01, 0x05]));
        assert!(matches!(
            parse(bytes),
            Err(ParseError::UnknownDiscriminant {
                what: "elem discriminant",
                found: 5,
                ..
            })
        ));
    }

    #[test]
    fn code_with_exception_handling() {
        // one () -> () function whose body is try/throw/catch
        let func_body: Vec<u8> = vec![
            0x00, // no locals
            0x06, 0x40, // try (empty blocktype)
            0x08, 0x00, // throw tag 0
            0x07, 0x00, // catch tag 0
            0x0B, // end of try
            0x0B, // end of function
        ];
        let mut code = vec![0x01, func_body.len() as u8];
        code.extend(&func_body);

        let mut bytes = header();
        bytes.extend(section(1, &[0x01, 0x60, 0x00, 0x00]));
        bytes.extend(section(3, &[0x01, 0x00]));
        bytes.extend(section(13, &[0x01, 0x00, 0x00]));
        bytes.extend(section(10, &code));
        assert!(parse(bytes).is_ok());
    }

    // LEB128 boundaries through the public reader -----------------------------

    #[rstest]
    #[case(vec![0x00], Some(0x00))]
    #[case(vec![0x42], Some(0x42))]
    #[case(vec![0x83, 0x00], Some(0x03))]
    #[case(vec![0x83, 0x10], None)] // terminator exceeds u8 range
    #[case(vec![0x80, 0x88, 0x00], None)] // middle byte exceeds u8 range
    #[case(vec![0x80], None)] // EOF
    fn u8_boundaries(#[case] bytes: Vec<u8>, #[case] expected: Option<u8>) {
        let result = Reader::new(bytes).read_vu8();
        assert_eq!(result.ok(), expected);
    }

    #[rstest]
    #[case(vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F], Some(0xFFFFFFFF))]
    #[case(vec![0xFF, 0xFF, 0xFF, 0xFF, 0x1F], None)]
    fn u32_boundaries(#[case] bytes: Vec<u8>, #[case] expected: Option<u32>) {
        let result = Reader::new(bytes).read_vu32();
        assert_eq!(result.ok(), expected);
    }

    #[rstest]
    #[case(vec![0x7F], Some(-1))]
    #[case(vec![0x7E], Some(-2))]
    #[case(vec![0xFE, 0x7F], Some(-2))]
    #[case(vec![0xFF, 0x7B], None)]
    fn s8_boundaries(#[case] bytes: Vec<u8>, #[case] expected: Option<i8>) {
        let result = Reader::new(bytes).read_vs8();
        assert_eq!(result.ok(), expected);
    }

    // Whole modules assembled from WAT source ---------------------------------

    #[test]
    fn wat_function_with_export() {
        let module = parse_wat(
            r#"(module
                (func (export "add") (param i32 i32) (result i32)
                    local.get 0
                    local.get 1
                    i32.add))"#,
        );
        assert_eq!(
            module.types,
            vec![FunctionType {
                params: vec![ValueType::I32, ValueType::I32],
                results: vec![ValueType::I32],
            }]
        );
    }

    #[test]
    fn wat_imports_populate_ast() {
        let module = parse_wat(
            r#"(module
                (import "env" "tick" (func))
                (import "env" "mem" (memory 1))
                (import "env" "tbl" (table 1 funcref))
                (import "env" "g" (global i32)))"#,
        );
        assert_eq!(module.imports.len(), 4);
        assert_eq!(module.imports[0].module, "env");
        assert_eq!(module.imports[0].name, "tick");
        assert_eq!(module.imports[3].name, "g");
    }

    #[test]
    fn wat_memory_global_data_sections() {
        let module = parse_wat(
            r#"(module
                (memory 1 2)
                (global (mut i32) (i32.const 0))
                (global f64 (f64.const 681.125))
                (data (i32.const 8) "hi")
                (data "passive"))"#,
        );
        assert!(module.types.is_empty());
    }

    #[test]
    fn wat_table_element_start() {
        let module = parse_wat(
            r#"(module
                (table 1 funcref)
                (func)
                (elem (i32.const 0) func 0)
                (start 0))"#,
        );
        assert_eq!(module.types.len(), 1);
    }

    #[test]
    fn wat_control_flow_and_memory_ops() {
        assert!(parse_wat(
            r#"(module
                (memory 1)
                (func (param i32) (result i32)
                    block
                        loop
                            local.get 0
                            i32.eqz
                            br_if 1
                            br 0
                        end
                    end
                    local.get 0
                    if (result i32)
                        i32.const 1
                    else
                        i32.const 4
                        i32.load offset=4
                    end
                    memory.size
                    i32.add))"#,
        )
        .types
        .len()
            == 1);
    }

    #[test]
    fn wat_indirect_call_and_br_table() {
        parse_wat(
            r#"(module
                (table 2 funcref)
                (type $t (func))
                (func $target)
                (func (param i32)
                    block
                        block
                            local.get 0
                            br_table 0 1 0
                        end
                    end
                    i32.const 0
                    call_indirect (type $t)
                    call $target))"#,
        );
    }

    #[test]
    fn wat_numeric_instructions() {
        parse_wat(
            r#"(module
                (func (result f64)
                    i32.const 7
                    i32.const 3
                    i32.div_s
                    i64.extend_i32_s
                    i64.const -1
                    i64.xor
                    f64.convert_i64_s
                    f64.sqrt
                    f64.const 2.5
                    f64.mul)
                (func (result i32)
                    i32.const 10
                    i32.extend8_s
                    i32.const 3
                    i32.rotl
                    i32.clz))"#,
        );
    }

    #[test]
    fn wat_bulk_memory_instructions() {
        parse_wat(
            r#"(module
                (memory 1)
                (data "abc")
                (func
                    i32.const 0
                    i32.const 0
                    i32.const 3
                    memory.init 0
                    data.drop 0
                    i32.const 0
                    i32.const 8
                    i32.const 4
                    memory.copy
                    i32.const 0
                    i32.const 0
                    i32.const 16
                    memory.fill))"#,
        );
    }

    #[test]
    fn wat_atomic_instructions() {
        parse_wat(
            r#"(module
                (memory 1 1 shared)
                (func (result i32)
                    i32.const 0
                    i32.atomic.load
                    i32.const 4
                    i32.const 1
                    i32.atomic.rmw.add
                    drop
                    i32.const 8
                    i32.const 0
                    i32.const 1
                    i32.atomic.rmw.cmpxchg
                    drop
                    i32.const 0
                    i32.const 1
                    memory.atomic.notify))"#,
        );
    }
}
