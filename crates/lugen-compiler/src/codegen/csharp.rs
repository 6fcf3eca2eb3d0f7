//! C# recognizer class generation.
//!
//! The generated class implements `IRecognizerConvert` from the Bot Builder
//! LUIS package and binds with Newtonsoft.Json:
//!
//! ```text
//! namespace {ns}
//! └── partial class {Name}
//!     ├── Text, AlteredText
//!     ├── enum Intent + Intents
//!     ├── class _Entities
//!     │   ├── one field per entity (simple, built-in, lists, regex, pattern.any)
//!     │   ├── _Instance{Composite} + {Composite}Class per composite
//!     │   └── class _Instance (span metadata)
//!     ├── Properties (extension data)
//!     ├── Convert(dynamic)
//!     ├── OnError
//!     └── TopIntent()
//! ```

use std::collections::{BTreeSet, HashSet};

use super::naming::{CSharpNaming, Naming};
use super::writer::CodeWriter;
use super::{ClassName, Target};
use crate::diagnostic::CompilerError;
use crate::ir::{ApplicationModel, CompositeDef, EntityKind, EntityRef};

const HEADER: &[&str] = &[
    "// <auto-generated>",
    "// Code generated by lugen generate",
    "// Changes may cause incorrect behavior and will be lost if the code is",
    "// regenerated.",
    "// </auto-generated>",
    "using Newtonsoft.Json;",
    "using Newtonsoft.Json.Serialization;",
    "using System;",
    "using System.Collections.Generic;",
    "using Microsoft.Bot.Builder;",
    "using Microsoft.Bot.Builder.AI.Luis;",
];

/// C# target using [`CSharpNaming`].
#[derive(Debug, Default)]
pub struct CSharpTarget {
    naming: CSharpNaming,
}

impl Target for CSharpTarget {
    fn language(&self) -> &str {
        "cs"
    }

    fn extension(&self) -> &str {
        "cs"
    }

    fn generate(&self, model: &ApplicationModel, class: &ClassName) -> Result<String, CompilerError> {
        generate(model, class, &self.naming)
    }
}

/// Generates the recognizer class for `model`.
pub fn generate(
    model: &ApplicationModel,
    class: &ClassName,
    naming: &dyn Naming,
) -> Result<String, CompilerError> {
    let mut w = CodeWriter::new();
    Emitter { model, naming }.class(&mut w, class)?;
    w.finish()
}

/// Field type for an entity kind.
pub fn field_type(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Age => "Age[]",
        EntityKind::DateTime => "DateTimeSpec[]",
        EntityKind::Dimension => "Dimension[]",
        EntityKind::Geography => "GeographyV2[]",
        EntityKind::List => "string[][]",
        EntityKind::Money => "Money[]",
        EntityKind::Ordinal => "OrdinalV2[]",
        EntityKind::Temperature => "Temperature[]",
        EntityKind::Number => "double[]",
        EntityKind::Text => "string[]",
    }
}

struct Emitter<'a> {
    model: &'a ApplicationModel,
    naming: &'a dyn Naming,
}

/// Identifiers declared in one generated scope.
struct Members {
    scope: String,
    seen: HashSet<String>,
}

impl Members {
    fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            seen: HashSet::new(),
        }
    }

    /// Records `identifier`, failing if the scope already declares it.
    fn declare(&mut self, identifier: String) -> Result<String, CompilerError> {
        if self.seen.insert(identifier.clone()) {
            Ok(identifier)
        } else {
            Err(CompilerError::DuplicateIdentifier {
                identifier,
                scope: self.scope.clone(),
            })
        }
    }
}

impl Emitter<'_> {
    fn class(&self, w: &mut CodeWriter, class: &ClassName) -> Result<(), CompilerError> {
        w.lines(HEADER);
        let header = format!("public partial class {}: IRecognizerConvert", class.name);
        w.block(&format!("namespace {}", class.namespace), |w| {
            w.block(&header, |w| -> Result<(), CompilerError> {
                w.lines(["[JsonProperty(\"text\")]", "public string Text;"]);
                w.blank();
                w.lines(["[JsonProperty(\"alteredText\")]", "public string AlteredText;"]);
                w.blank();
                self.intents(w)?;
                self.entities(w)?;
                w.blank();
                w.lines([
                    "[JsonExtensionData(ReadData = true, WriteData = true)]",
                    "public IDictionary<string, object> Properties {get; set; }",
                ]);
                self.converter(w, &class.name);
                self.on_error(w);
                self.top_intent(w);
                Ok(())
            })
        })
    }

    fn intents(&self, w: &mut CodeWriter) -> Result<(), CompilerError> {
        let mut members = Members::new("Intent");
        let names = self
            .model
            .intents
            .iter()
            .map(|intent| members.declare(self.naming.enum_member(intent)))
            .collect::<Result<Vec<_>, _>>()?;

        w.scope("public enum Intent {", "};", |w| {
            if let Some((last, rest)) = names.split_last() {
                for name in rest {
                    w.line(format!("{},", name));
                }
                w.line(last);
            }
        });
        w.lines([
            "[JsonProperty(\"intents\")]",
            "public Dictionary<Intent, IntentScore> Intents;",
        ]);
        Ok(())
    }

    fn entities(&self, w: &mut CodeWriter) -> Result<(), CompilerError> {
        let model = self.model;
        let mut members = Members::new("_Entities");

        w.blank();
        w.block("public class _Entities", |w| -> Result<(), CompilerError> {
            self.group(w, &mut members, "Simple entities", &model.entities, None)?;

            if !model.prebuilt_entities.is_empty() {
                w.line("// Built-in entities");
                for group in &model.prebuilt_entities {
                    for entity in &group.entities {
                        let tag = Some(group.builtin.as_str());
                        let field = self.entity_field(&mut members, entity, tag)?;
                        w.line(field);
                    }
                }
                w.blank();
            }

            self.group(w, &mut members, "Lists", &model.closed_lists, Some("list"))?;
            self.group(w, &mut members, "Regex entities", &model.regex_entities, None)?;
            self.group(w, &mut members, "Pattern.any", &model.pattern_any_entities, None)?;

            if !model.composites.is_empty() {
                w.blank();
                w.line("// Composites");
                for (i, composite) in model.composites.iter().enumerate() {
                    if i > 0 {
                        w.blank();
                    }
                    self.composite(w, &mut members, composite)?;
                }
            }

            w.blank();
            w.line("// Instance");
            members.declare("_Instance".to_string())?;
            w.block("public class _Instance", |w| {
                for field in self.instance_fields() {
                    w.line(format!("public InstanceData[] {};", field));
                }
            });
            members.declare("_instance".to_string())?;
            w.lines(["[JsonProperty(\"$instance\")]", "public _Instance _instance;"]);
            Ok(())
        })?;
        w.lines(["[JsonProperty(\"entities\")]", "public _Entities Entities;"]);
        Ok(())
    }

    fn group(
        &self,
        w: &mut CodeWriter,
        members: &mut Members,
        banner: &str,
        entities: &[EntityRef],
        tag: Option<&str>,
    ) -> Result<(), CompilerError> {
        if entities.is_empty() {
            return Ok(());
        }

        w.line(format!("// {}", banner));
        for entity in entities {
            let field = self.entity_field(members, entity, tag)?;
            w.line(field);
        }
        w.blank();
        Ok(())
    }

    fn composite(
        &self,
        w: &mut CodeWriter,
        members: &mut Members,
        composite: &CompositeDef,
    ) -> Result<(), CompilerError> {
        let prefix = self.naming.type_prefix(&composite.name);
        let instance_class = members.declare(format!("_Instance{}", prefix))?;
        let value_class = members.declare(format!("{}Class", prefix))?;

        w.block(&format!("public class {}", instance_class), |w| -> Result<(), CompilerError> {
            let mut fields = Members::new(instance_class.as_str());
            for attribute in &composite.attributes {
                let name = fields.declare(self.naming.property_name(attribute.name()))?;
                w.line(format!("public InstanceData[] {};", name));
            }
            Ok(())
        })?;
        w.block(&format!("public class {}", value_class), |w| -> Result<(), CompilerError> {
            let mut fields = Members::new(value_class.as_str());
            for attribute in &composite.attributes {
                let tag = self.model.attribute_tag(attribute.name());
                let field = self.entity_field(&mut fields, attribute, Some(tag))?;
                w.line(field);
            }
            fields.declare("_instance".to_string())?;
            w.lines([
                "[JsonProperty(\"$instance\")]".to_string(),
                format!("public {} _instance;", instance_class),
            ]);
            Ok(())
        })?;

        let property = members.declare(self.naming.property_name(&composite.name))?;
        w.line(format!("public {}[] {};", value_class, property));
        Ok(())
    }

    /// Field declaration for an entity, declared in `members`. `explicit` is
    /// the tag of the enclosing group; a typed entity's own tag overrides it,
    /// and composite references skip the type table.
    fn entity_field(
        &self,
        members: &mut Members,
        entity: &EntityRef,
        explicit: Option<&str>,
    ) -> Result<String, CompilerError> {
        let identifier = members.declare(self.naming.property_name(entity.name()))?;
        let field_type = match entity.effective_tag(explicit) {
            Some(tag) => field_type(EntityKind::from_tag(tag)).to_string(),
            None => format!("{}Class[]", self.naming.type_prefix(entity.name())),
        };
        Ok(format!("public {} {};", field_type, identifier))
    }

    /// Normalized, sorted, deduplicated instance field names.
    fn instance_fields(&self) -> BTreeSet<String> {
        self.model
            .instance_fields()
            .into_iter()
            .map(|name| self.naming.property_name(name))
            .collect()
    }

    fn converter(&self, w: &mut CodeWriter, class_name: &str) {
        w.blank();
        w.block("public void Convert(dynamic result)", |w| {
            w.scope(
                &format!("var app = JsonConvert.DeserializeObject<{}>(", class_name),
                ");",
                |w| {
                    w.scope("JsonConvert.SerializeObject(", ")", |w| {
                        w.lines([
                            "result,",
                            "new JsonSerializerSettings { NullValueHandling = NullValueHandling.Ignore, Error = OnError }",
                        ]);
                    });
                },
            );
            w.lines([
                "Text = app.Text;",
                "AlteredText = app.AlteredText;",
                "Intents = app.Intents;",
                "Entities = app.Entities;",
                "Properties = app.Properties;",
            ]);
        });
    }

    fn on_error(&self, w: &mut CodeWriter) {
        w.blank();
        w.block("private static void OnError(object sender, ErrorEventArgs args)", |w| {
            w.lines([
                "// If needed, put your custom error logic here",
                "Console.WriteLine(args.ErrorContext.Error.Message);",
                "args.ErrorContext.Handled = true;",
            ]);
        });
    }

    fn top_intent(&self, w: &mut CodeWriter) {
        w.blank();
        w.block("public (Intent intent, double score) TopIntent()", |w| {
            w.lines(["Intent maxIntent = Intent.None;", "var max = 0.0;"]);
            w.block("foreach (var entry in Intents)", |w| {
                w.block("if (entry.Value.Score > max)", |w| {
                    w.lines(["maxIntent = entry.Key;", "max = entry.Value.Score.Value;"]);
                });
            });
            w.line("return (maxIntent, max);");
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{CompositeDef, PrebuiltGroup};

    fn class() -> ClassName {
        ClassName::parse("Contoso.Travel").unwrap()
    }

    fn emit(model: &ApplicationModel) -> String {
        generate(model, &class(), &CSharpNaming).unwrap()
    }

    fn entities_block(output: &str) -> &str {
        let start = output.find("public class _Entities").unwrap();
        let end = output.find("public _Entities Entities;").unwrap();
        &output[start..end]
    }

    fn booking_model() -> ApplicationModel {
        ApplicationModel {
            intents: vec!["Book".to_string(), "Cancel".to_string(), "None".to_string()],
            entities: vec![EntityRef::from("city")],
            prebuilt_entities: vec![PrebuiltGroup {
                builtin: "number".to_string(),
                entities: vec![EntityRef::from("amount")],
            }],
            composites: vec![CompositeDef {
                name: "Booking".to_string(),
                attributes: vec![EntityRef::from("city"), EntityRef::from("amount")],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_field_type_table() {
        let cases = [
            ("age", "Age[]"),
            ("datetimeV2", "DateTimeSpec[]"),
            ("dimension", "Dimension[]"),
            ("geographyV2", "GeographyV2[]"),
            ("list", "string[][]"),
            ("money", "Money[]"),
            ("ordinalV2", "OrdinalV2[]"),
            ("temperature", "Temperature[]"),
            ("number", "double[]"),
            ("ordinal", "double[]"),
            ("percentage", "double[]"),
            ("email", "string[]"),
        ];

        for (tag, expected) in cases {
            assert_eq!(field_type(EntityKind::from_tag(Some(tag))), expected, "tag {}", tag);
        }
        assert_eq!(field_type(EntityKind::from_tag(None)), "string[]");
    }

    #[test]
    fn test_intent_enum_has_no_trailing_separator() {
        let output = emit(&booking_model());
        assert!(output.contains(
            "        public enum Intent {\n            Book,\n            Cancel,\n            None\n        };\n"
        ));
    }

    #[test]
    fn test_intents_not_consumed() {
        let model = booking_model();
        let first = emit(&model);
        let second = emit(&model);
        assert_eq!(model.intents.len(), 3);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_intents_enum() {
        let output = emit(&ApplicationModel::default());
        assert!(output.contains("        public enum Intent {\n        };\n"));
    }

    #[test]
    fn test_booking_entities() {
        let output = emit(&booking_model());
        let expected = "\
public class _Entities
        {
            // Simple entities
            public string[] city;

            // Built-in entities
            public double[] amount;


            // Composites
            public class _InstanceBooking
            {
                public InstanceData[] city;
                public InstanceData[] amount;
            }
            public class BookingClass
            {
                public string[] city;
                public double[] amount;
                [JsonProperty(\"$instance\")]
                public _InstanceBooking _instance;
            }
            public BookingClass[] Booking;

            // Instance
            public class _Instance
            {
                public InstanceData[] Booking;
                public InstanceData[] amount;
                public InstanceData[] city;
            }
            [JsonProperty(\"$instance\")]
            public _Instance _instance;
        }
        [JsonProperty(\"entities\")]
        ";
        assert_eq!(entities_block(&output), expected);
    }

    #[test]
    fn test_closed_list_attribute_tagged_list() {
        let model = ApplicationModel {
            entities: vec![EntityRef::from("b")],
            closed_lists: vec![EntityRef::from("a")],
            composites: vec![CompositeDef {
                name: "pair".to_string(),
                attributes: vec![EntityRef::from("a"), EntityRef::from("b")],
            }],
            ..Default::default()
        };

        let output = emit(&model);
        assert!(output.contains(
            "            public class PairClass\n            {\n                public string[][] a;\n                public string[] b;\n"
        ));
        assert!(output.contains("            // Lists\n            public string[][] a;\n"));
        assert!(output.contains("            public PairClass[] pair;\n"));
    }

    #[test]
    fn test_composite_reference_skips_type_table() {
        let model = ApplicationModel {
            composites: vec![CompositeDef {
                name: "Trip".to_string(),
                attributes: vec![
                    EntityRef::Composite { name: "x".to_string() },
                    EntityRef::Typed {
                        name: "when".to_string(),
                        kind_tag: Some("datetimeV2".to_string()),
                    },
                ],
            }],
            ..Default::default()
        };

        let output = emit(&model);
        assert!(output.contains("                public XClass[] x;\n"));
        assert!(output.contains("                public DateTimeSpec[] when;\n"));
    }

    #[test]
    fn test_typed_entity_overrides_group_tag() {
        let model = ApplicationModel {
            closed_lists: vec![EntityRef::Typed {
                name: "price".to_string(),
                kind_tag: Some("money".to_string()),
            }],
            ..Default::default()
        };

        let output = emit(&model);
        assert!(output.contains("            public Money[] price;\n"));
    }

    #[test]
    fn test_groups_in_fixed_order() {
        let model = ApplicationModel {
            entities: vec![EntityRef::from("s")],
            prebuilt_entities: vec![PrebuiltGroup {
                builtin: "age".to_string(),
                entities: vec![EntityRef::from("age")],
            }],
            closed_lists: vec![EntityRef::from("l")],
            regex_entities: vec![EntityRef::from("r")],
            pattern_any_entities: vec![EntityRef::from("p")],
            ..Default::default()
        };

        let output = emit(&model);
        let positions: Vec<usize> = [
            "// Simple entities",
            "// Built-in entities",
            "// Lists",
            "// Regex entities",
            "// Pattern.any",
            "// Instance",
        ]
        .iter()
        .map(|banner| output.find(banner).unwrap())
        .collect();

        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(!output.contains("// Composites"));
        assert!(output.contains("            public Age[] age;\n"));
    }

    #[test]
    fn test_composites_separated_by_blank_line() {
        let model = ApplicationModel {
            composites: vec![
                CompositeDef {
                    name: "A".to_string(),
                    attributes: vec![],
                },
                CompositeDef {
                    name: "B".to_string(),
                    attributes: vec![],
                },
            ],
            ..Default::default()
        };

        let output = emit(&model);
        assert!(output.contains("            // Composites\n            public class _InstanceA\n"));
        assert!(output.contains("            public AClass[] A;\n\n            public class _InstanceB\n"));
    }

    #[test]
    fn test_convert_and_top_intent() {
        let output = emit(&booking_model());

        let convert = "        public void Convert(dynamic result)
        {
            var app = JsonConvert.DeserializeObject<Travel>(
                JsonConvert.SerializeObject(
                    result,
                    new JsonSerializerSettings { NullValueHandling = NullValueHandling.Ignore, Error = OnError }
                )
            );
            Text = app.Text;
            AlteredText = app.AlteredText;
            Intents = app.Intents;
            Entities = app.Entities;
            Properties = app.Properties;
        }
";
        assert!(output.contains(convert));

        let top_intent = "        public (Intent intent, double score) TopIntent()
        {
            Intent maxIntent = Intent.None;
            var max = 0.0;
            foreach (var entry in Intents)
            {
                if (entry.Value.Score > max)
                {
                    maxIntent = entry.Key;
                    max = entry.Value.Score.Value;
                }
            }
            return (maxIntent, max);
        }
    }
}
";
        assert!(output.ends_with(top_intent));
        assert!(output.contains("            args.ErrorContext.Handled = true;\n"));
    }

    #[test]
    fn test_header_and_class() {
        let output = emit(&booking_model());
        assert!(output.starts_with("// <auto-generated>\n"));
        assert!(output.contains("namespace Contoso\n{\n    public partial class Travel: IRecognizerConvert\n    {\n"));
        assert!(output.contains(
            "        [JsonProperty(\"text\")]\n        public string Text;\n\n        [JsonProperty(\"alteredText\")]\n        public string AlteredText;\n\n        public enum Intent {\n"
        ));
        assert!(output.contains(
            "        [JsonProperty(\"entities\")]\n        public _Entities Entities;\n\n        [JsonExtensionData(ReadData = true, WriteData = true)]\n"
        ));
    }

    #[test]
    fn test_intent_members_use_naming() {
        let model = ApplicationModel {
            intents: vec!["Book-Flight".to_string(), "default".to_string(), "None".to_string()],
            ..Default::default()
        };

        let output = emit(&model);
        assert!(output.contains(
            "        public enum Intent {\n            Book_Flight,\n            @default,\n            None\n        };\n"
        ));
    }

    #[test]
    fn test_colliding_intents_rejected() {
        let model = ApplicationModel {
            intents: vec!["Book-Flight".to_string(), "Book_Flight".to_string()],
            ..Default::default()
        };

        let err = generate(&model, &class(), &CSharpNaming).unwrap_err();
        assert!(matches!(
            err,
            CompilerError::DuplicateIdentifier { ref identifier, ref scope }
                if identifier == "Book_Flight" && scope == "Intent"
        ));
    }

    #[test]
    fn test_colliding_fields_rejected() {
        let model = ApplicationModel {
            entities: vec![EntityRef::from("a-b")],
            regex_entities: vec![EntityRef::from("a_b")],
            ..Default::default()
        };

        let err = generate(&model, &class(), &CSharpNaming).unwrap_err();
        assert!(err.is_generation_error());
        assert!(matches!(
            err,
            CompilerError::DuplicateIdentifier { ref identifier, ref scope }
                if identifier == "a_b" && scope == "_Entities"
        ));
    }

    #[test]
    fn test_colliding_composite_attributes_rejected() {
        let model = ApplicationModel {
            composites: vec![CompositeDef {
                name: "Trip".to_string(),
                attributes: vec![EntityRef::from("from city"), EntityRef::from("from_city")],
            }],
            ..Default::default()
        };

        let err = generate(&model, &class(), &CSharpNaming).unwrap_err();
        assert!(matches!(
            err,
            CompilerError::DuplicateIdentifier { ref scope, .. } if scope == "_InstanceTrip"
        ));
    }

    #[test]
    fn test_entity_shadowing_instance_rejected() {
        let model = ApplicationModel {
            entities: vec![EntityRef::from("_instance")],
            ..Default::default()
        };

        assert!(matches!(
            generate(&model, &class(), &CSharpNaming),
            Err(CompilerError::DuplicateIdentifier { .. })
        ));
    }
}
