use std::sync::{
  Arc,
  atomic::{AtomicUsize, Ordering},
};

use parking_lot::Mutex;

use crate::{
  Error,
  events::{DomainEventKind, EventBus, EventPhase},
  facet::{Facet, FacetHolder, FacetType, Precedence},
  facets::{
    ActionInvocationFacet, Contributing, ContributingFacet,
    DisableForContextFacet, DisabledFacet, DomainEventFacet, HiddenFacet,
    MixinFacet, PropertyAccessorFacet, ValidateForContextFacet,
    ensure_mixin_type,
  },
  identifier::{FeatureType, Identifier, LogicalType},
  interaction::{
    AccessContext, HidingInteractionAdvisor, InteractionContext,
    InteractionContextType, InteractionInitiatedBy, Proposal,
    UsabilityContext, VisibilityContext, Where, evaluate, is_usable_result,
    is_visible_result,
  },
  introspect::{
    Annotation, ConstructorDescriptor, MemberDescriptor, ParameterDescriptor,
    ProgrammingModel, TypeDescriptor,
  },
  object::{ManagedObject, Pojo},
  services::ServiceRegistry,
  spec::{
    BeanSort, ObjectMember, ObjectSpecification, SpecificationLoader,
    ValidationFailures,
  },
};

const USER: InteractionInitiatedBy = InteractionInitiatedBy::User;
const FRAMEWORK: InteractionInitiatedBy = InteractionInitiatedBy::Framework;

// ─── Fixtures ────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct Customer {
  name:  String,
  notes: Option<String>,
}

#[derive(Debug)]
struct AddressesMixin {
  owner: String,
}

fn text_spec() -> Arc<ObjectSpecification> {
  Arc::new(
    ObjectSpecification::builder(LogicalType::new("demo.Text"))
      .bean_sort(BeanSort::Value)
      .build(),
  )
}

fn text(value: &str) -> ManagedObject {
  ManagedObject::of(text_spec(), value.to_string())
}

fn customer_descriptor() -> TypeDescriptor {
  TypeDescriptor::new("demo.Customer")
    .nature(BeanSort::Entity)
    .supertype("demo.Party")
    .member(
      MemberDescriptor::property("name")
        .annotate(Annotation::MaxLength(8))
        .facet(PropertyAccessorFacet::new(|target| {
          let customer = target.pojo_as::<Customer>()?;
          Some(text(&customer.name))
        })),
    )
    .member(
      MemberDescriptor::property("notes")
        .annotate(Annotation::Optional)
        .facet(PropertyAccessorFacet::new(|target| {
          let notes = target.pojo_as::<Customer>()?.notes.as_deref()?;
          Some(text(notes))
        })),
    )
    .member(
      MemberDescriptor::property("secret")
        .annotate(Annotation::Hidden(Where::NotSpecified)),
    )
    .member(
      MemberDescriptor::action("rename")
        .annotate(Annotation::DomainEvent)
        .parameter(ParameterDescriptor::new("newName"))
        .facet(ActionInvocationFacet::new(|_, args| {
          Ok(args.first().cloned())
        })),
    )
}

fn mixin_descriptor() -> TypeDescriptor {
  TypeDescriptor::new("demo.Customer_addresses")
    .nature(BeanSort::Mixin)
    .constructor(
      ConstructorDescriptor::new(vec![LogicalType::new("demo.Party")])
        .with_factory(|mixee, _| {
          let customer = mixee.require_pojo_as::<Customer>()?;
          Ok(Arc::new(AddressesMixin {
            owner: customer.name.clone(),
          }) as Pojo)
        }),
    )
    .member(
      MemberDescriptor::collection("act")
        .annotate(Annotation::Contributed(Contributing::AsCollection)),
    )
}

struct Metamodel {
  loader:   SpecificationLoader,
  bus:      Arc<EventBus>,
  services: ServiceRegistry,
  customer: Arc<ObjectSpecification>,
}

fn metamodel() -> Metamodel {
  let bus = Arc::new(EventBus::new());
  let services = ServiceRegistry::new().with(Arc::clone(&bus));
  let loader = SpecificationLoader::new();
  loader.introspect(
    &ProgrammingModel::default(),
    &[
      TypeDescriptor::new("demo.Party"),
      customer_descriptor(),
      mixin_descriptor(),
    ],
    &services,
  );
  let customer = loader
    .specification_for(&LogicalType::new("demo.Customer"))
    .unwrap();
  Metamodel {
    loader,
    bus,
    services,
    customer,
  }
}

fn ada(customer: &Arc<ObjectSpecification>) -> ManagedObject {
  ManagedObject::of(Arc::clone(customer), Customer {
    name:  "Ada".into(),
    notes: None,
  })
}

// ─── Advisors ────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct CountingAdvisor {
  facet_type: FacetType,
  verdict:    Option<&'static str>,
  consulted:  Arc<AtomicUsize>,
}

impl Facet for CountingAdvisor {
  fn facet_type(&self) -> FacetType { self.facet_type }

  fn as_hiding_advisor(&self) -> Option<&dyn HidingInteractionAdvisor> {
    Some(self)
  }
}

impl HidingInteractionAdvisor for CountingAdvisor {
  fn hides(&self, _: &VisibilityContext) -> Option<String> {
    self.consulted.fetch_add(1, Ordering::SeqCst);
    self.verdict.map(str::to_string)
  }
}

#[test]
fn first_veto_wins_but_every_advisor_is_consulted() {
  let consulted = Arc::new(AtomicUsize::new(0));
  let advisor = |name: &'static str, verdict| CountingAdvisor {
    facet_type: FacetType::new(name),
    verdict,
    consulted: Arc::clone(&consulted),
  };

  let lt = LogicalType::new("demo.Order");
  let member = ObjectMember::new(Identifier::property(lt.clone(), "total"))
    .with_facet(advisor("first", None))
    .with_facet(advisor("second", Some("R")))
    .with_facet(advisor("third", Some("too late")));
  let target = ManagedObject::of(
    Arc::new(ObjectSpecification::builder(lt).build()),
    0_u64,
  );

  let context = VisibilityContext::member(
    target,
    member.identifier().clone(),
    USER,
    Where::ObjectForms,
  );
  let result = is_visible_result(&member, &context);

  assert!(result.is_vetoed());
  assert_eq!(result.reason(), Some("R"));
  assert_eq!(
    result.advisor().map(|facet| facet.facet_type()),
    Some(FacetType::new("second"))
  );
  assert_eq!(consulted.load(Ordering::SeqCst), 3);
}

// ─── Mixins ──────────────────────────────────────────────────────────────────

#[test]
fn mixin_constructor_cardinality() {
  let party = || LogicalType::new("demo.Party");
  let cases = [
    (vec![], false, Some("missing public 1-arg constructor")),
    (vec![vec![party()]], true, None),
    (vec![vec![], vec![party()]], true, None),
    (
      vec![vec![party()], vec![LogicalType::new("demo.Other")]],
      false,
      Some("needs a single public 1-arg constructor but has 2"),
    ),
  ];

  for (constructors, expected, message) in cases {
    let failures = ValidationFailures::new();
    let mut candidate = TypeDescriptor::new("demo.Party_mixin");
    for parameter_types in constructors {
      candidate = candidate.constructor(ConstructorDescriptor::new(parameter_types));
    }

    assert_eq!(ensure_mixin_type(&candidate, &failures), expected);
    match message {
      None => assert!(failures.is_empty()),
      Some(message) => {
        let raised = failures.snapshot();
        assert_eq!(raised.len(), 1);
        assert!(raised[0].message.contains(message), "{}", raised[0]);
      }
    }
  }
}

#[test]
fn mixin_sort_is_resolved_from_its_main_method() {
  let model = metamodel();
  let mixin_spec = model
    .loader
    .specification_for(&LogicalType::new("demo.Customer_addresses"))
    .unwrap();
  let mixin = mixin_spec.mixin_facet().unwrap();

  assert_eq!(mixin.contributing(), Contributing::AsCollection);
  assert_eq!(mixin.member_name(), "addresses");
  assert!(mixin.is_mixin_for(&model.customer));

  let contributors = model.loader.mixins_for(&model.customer);
  assert_eq!(contributors.len(), 1);
  assert!(model.loader.is_valid(), "{}", model.loader.validation_report());
}

#[test]
fn mixin_without_contributed_annotation_defaults_to_action() {
  let loader = SpecificationLoader::new();
  let specs = loader.introspect(
    &ProgrammingModel::default(),
    &[
      TypeDescriptor::new("demo.Party"),
      TypeDescriptor::new("demo.Party_archive")
        .nature(BeanSort::Mixin)
        .constructor(ConstructorDescriptor::new(vec![LogicalType::new(
          "demo.Party",
        )]))
        .member(MemberDescriptor::action("act")),
    ],
    &ServiceRegistry::new(),
  );
  let mixin = specs[1].mixin_facet().unwrap();
  assert_eq!(mixin.contributing(), Contributing::AsAction);

  // already resolved; a second resolution is ignored
  let member = ObjectMember::new(Identifier::collection(
    LogicalType::new("demo.Party_archive"),
    "act",
  ))
  .with_facet(ContributingFacet::new(
    Contributing::AsCollection,
    Precedence::High,
  ));
  mixin.init_mixin_sort_from(&member);
  assert_eq!(mixin.contributing(), Contributing::AsAction);
}

#[test]
fn main_method_may_be_declared_on_a_supertype() {
  let descriptor = TypeDescriptor::new("demo.Party_tag")
    .nature(BeanSort::Mixin)
    .supertype("demo.TagMixin")
    .mixin_method("apply")
    .constructor(ConstructorDescriptor::new(vec![LogicalType::new(
      "demo.Party",
    )]));
  let mixin = MixinFacet::create(&descriptor, &ValidationFailures::new()).unwrap();

  assert!(mixin.is_candidate_for_main(&MemberDescriptor::action("apply")));
  assert!(mixin.is_candidate_for_main(
    &MemberDescriptor::action("apply").declared_by("demo.TagMixin")
  ));
  assert!(!mixin.is_candidate_for_main(
    &MemberDescriptor::action("apply").declared_by("demo.Unrelated")
  ));
  assert!(!mixin.is_candidate_for_main(&MemberDescriptor::action("act")));
}

#[test]
fn mixin_instantiation() {
  let model = metamodel();
  let mixin_spec = model
    .loader
    .specification_for(&LogicalType::new("demo.Customer_addresses"))
    .unwrap();
  let mixin = mixin_spec.mixin_facet().unwrap();

  let pojo = mixin
    .instantiate(Some(&ada(&model.customer)), &model.services)
    .unwrap();
  assert_eq!(pojo.downcast_ref::<AddressesMixin>().unwrap().owner, "Ada");

  assert!(matches!(
    mixin.instantiate(None, &model.services),
    Err(Error::MixinInstantiation { .. })
  ));
  assert!(matches!(
    mixin.instantiate(Some(&text("not a party")), &model.services),
    Err(Error::MixinInstantiation { .. })
  ));
}

#[test]
fn mixin_missing_holder_type_is_reported() {
  let loader = SpecificationLoader::new();
  loader.introspect(
    &ProgrammingModel::default(),
    &[TypeDescriptor::new("demo.Ghost_haunt")
      .nature(BeanSort::Mixin)
      .constructor(ConstructorDescriptor::new(vec![LogicalType::new(
        "demo.Ghost",
      )]))
      .member(MemberDescriptor::action("act"))],
    &ServiceRegistry::new(),
  );
  let report = loader.validation_report();
  assert!(report.contains("demo.Ghost is not a known type"), "{report}");
}

#[test]
fn supertypes_are_flattened_across_levels() {
  let loader = SpecificationLoader::new();
  let model = ProgrammingModel::default();
  let services = ServiceRegistry::new();
  loader.introspect(
    &model,
    &[TypeDescriptor::new("demo.Party").supertype("demo.Identifiable")],
    &services,
  );
  loader.introspect(
    &model,
    &[
      TypeDescriptor::new("demo.Customer").supertype("demo.Person"),
      TypeDescriptor::new("demo.Person").supertype("demo.Party"),
      TypeDescriptor::new("demo.Party_archive")
        .nature(BeanSort::Mixin)
        .constructor(ConstructorDescriptor::new(vec![LogicalType::new(
          "demo.Party",
        )]))
        .member(MemberDescriptor::action("act")),
    ],
    &services,
  );

  let customer = loader
    .specification_for(&LogicalType::new("demo.Customer"))
    .unwrap();
  assert_eq!(customer.supertypes(), [
    LogicalType::new("demo.Person"),
    LogicalType::new("demo.Party"),
    LogicalType::new("demo.Identifiable"),
  ]);
  assert!(customer.is_subtype_of(&LogicalType::new("demo.Party")));

  let mixins = loader.mixins_for(&customer);
  assert_eq!(mixins.len(), 1);
  assert_eq!(mixins[0].logical_type(), &LogicalType::new("demo.Party_archive"));
  assert!(loader.is_valid(), "{}", loader.validation_report());
}

#[test]
fn cyclic_supertypes_terminate() {
  let loader = SpecificationLoader::new();
  let specs = loader.introspect(
    &ProgrammingModel::default(),
    &[
      TypeDescriptor::new("demo.Egg").supertype("demo.Hen"),
      TypeDescriptor::new("demo.Hen").supertype("demo.Egg"),
    ],
    &ServiceRegistry::new(),
  );
  assert_eq!(specs[0].supertypes(), [LogicalType::new("demo.Hen")]);
  assert_eq!(specs[1].supertypes(), [LogicalType::new("demo.Egg")]);
}

// ─── Consent ─────────────────────────────────────────────────────────────────

#[test]
fn optional_annotation_overrides_inferred_mandatory() {
  let model = metamodel();
  let target = ada(&model.customer);
  let name = model.customer.member("name").unwrap();
  let notes = model.customer.member("notes").unwrap();

  let cleared = name.is_associated_value_valid(&target, None, USER);
  assert_eq!(cleared.reason(), Some("Mandatory"));
  let blank = name.is_associated_value_valid(&target, Some(text("  ")), USER);
  assert_eq!(blank.reason(), Some("Mandatory"));

  assert!(notes.is_associated_value_valid(&target, None, USER).is_not_vetoed());
}

#[test]
fn framework_bypasses_visibility_but_not_validity() {
  let model = metamodel();
  let target = ada(&model.customer);
  let secret = model.customer.member("secret").unwrap();

  assert!(secret.is_visible(&target, USER, Where::ObjectForms).is_vetoed());
  assert!(
    secret
      .is_visible(&target, FRAMEWORK, Where::ObjectForms)
      .is_not_vetoed()
  );

  let name = model.customer.member("name").unwrap();
  let too_long = name.is_associated_value_valid(
    &target,
    Some(text("Augusta Ada King")),
    FRAMEWORK,
  );
  assert!(too_long.is_vetoed());
}

#[test]
fn object_validation_collects_every_veto() {
  let model = metamodel();
  let lt = LogicalType::new("demo.Customer");
  let spec = Arc::new(
    ObjectSpecification::builder(lt.clone())
      .facet(ValidateForContextFacet::new(|_| Some("on hold".into())))
      .member(
        model
          .customer
          .member("name")
          .unwrap()
          .clone()
          .with_facet(HiddenFacet::new(Where::Everywhere)),
      )
      .build(),
  );
  let target = ManagedObject::of(Arc::clone(&spec), Customer {
    name:  "Ada Lovelace".into(),
    notes: None,
  });

  let results = spec.validate_object(&target, USER);
  assert_eq!(results.len(), 2);
  assert_eq!(results.reasons(), vec![
    "on hold",
    "Proposed value 'Ada Lovelace' exceeds the maximum length of 8",
  ]);
  assert_eq!(results.create_consent().reason(), Some("on hold"));
}

#[test]
fn disabled_facet_is_scoped_by_where() {
  let model = metamodel();
  let target = ada(&model.customer);
  let notes = model
    .customer
    .member("notes")
    .unwrap()
    .clone()
    .with_facet(DisabledFacet::new(Where::ObjectForms, None));

  let in_form = notes.is_usable(&target, USER, Where::ObjectForms);
  assert_eq!(in_form.reason(), Some("Always disabled"));
  assert_eq!(
    in_form.advisor().map(|facet| facet.facet_type()),
    Some(DisabledFacet::TYPE)
  );
  assert!(
    notes
      .is_usable(&target, USER, Where::StandaloneTables)
      .is_not_vetoed()
  );
  assert!(
    notes
      .is_usable(&target, FRAMEWORK, Where::ObjectForms)
      .is_not_vetoed()
  );
}

#[test]
fn disabled_annotation_applies_everywhere() {
  let loader = SpecificationLoader::new();
  let specs = loader.introspect(
    &ProgrammingModel::default(),
    &[TypeDescriptor::new("demo.Order").member(
      MemberDescriptor::property("total").annotate(Annotation::Disabled {
        where_: Where::NotSpecified,
        reason: Some("derived".into()),
      }),
    )],
    &ServiceRegistry::new(),
  );
  let order = ManagedObject::of(Arc::clone(&specs[0]), 0_u64);
  let total = specs[0].member("total").unwrap();

  for where_ in [Where::ObjectForms, Where::ParentedTables, Where::Anywhere] {
    assert_eq!(total.is_usable(&order, USER, where_).reason(), Some("derived"));
  }
}

#[test]
fn disable_for_context_sees_the_target() {
  let model = metamodel();
  let lt = LogicalType::new("demo.Customer");
  let member = ObjectMember::new(Identifier::action(lt, "close")).with_facet(
    DisableForContextFacet::new(|target| {
      let customer = target.pojo_as::<Customer>()?;
      (customer.name == "Ada").then(|| "Ada stays".to_string())
    }),
  );
  let usability = |target: ManagedObject| {
    let context = UsabilityContext::member(
      target,
      member.identifier().clone(),
      USER,
      Where::ObjectForms,
    );
    is_usable_result(&member, &context)
  };

  assert_eq!(usability(ada(&model.customer)).reason(), Some("Ada stays"));
  let grace = ManagedObject::of(Arc::clone(&model.customer), Customer {
    name:  "Grace".into(),
    notes: None,
  });
  assert!(usability(grace).is_not_vetoed());
}

#[test]
fn hidden_property_cannot_be_read() {
  let model = metamodel();
  let target = ada(&model.customer);
  let secret = model.customer.member("secret").unwrap();

  let context = InteractionContext::Access(AccessContext::member(
    target.clone(),
    secret.identifier().clone(),
    USER,
  ));
  assert_eq!(context.interaction_type(), InteractionContextType::PropertyRead);
  assert_eq!(evaluate(secret, &context).reason(), Some("Hidden"));

  assert!(matches!(
    secret.read(&target, USER),
    Err(Error::AccessVetoed { .. })
  ));
  assert!(secret.is_accessible(&target, FRAMEWORK).is_not_vetoed());

  let name = model.customer.member("name").unwrap();
  let value = name.read(&target, USER).unwrap();
  assert_eq!(
    value.as_ref().and_then(|value| value.pojo_as::<String>()),
    Some(&"Ada".to_string())
  );
}

// ─── Execution & events ──────────────────────────────────────────────────────

#[test]
fn subscriber_vetoes_surface_as_consent() {
  let model = metamodel();
  model.bus.subscribe(|event| {
    let phase = event.phase();
    if phase != EventPhase::Executing {
      event.veto(format!("no {phase}"));
    }
  });
  let target = ada(&model.customer);
  let rename = model.customer.member("rename").unwrap();

  let visible = rename.is_visible(&target, USER, Where::ObjectForms);
  assert_eq!(visible.reason(), Some("no hide"));
  assert_eq!(
    visible.advisor().map(|facet| facet.facet_type()),
    Some(DomainEventFacet::TYPE)
  );
  assert_eq!(
    rename.is_usable(&target, USER, Where::ObjectForms).reason(),
    Some("no disable")
  );
  let invocation = Proposal::ActionInvocation {
    args: vec![text("Grace")],
  };
  assert_eq!(
    rename.is_valid(&target, invocation.clone(), USER).reason(),
    Some("no validate")
  );

  assert!(
    rename
      .is_visible(&target, FRAMEWORK, Where::ObjectForms)
      .is_not_vetoed()
  );
  assert!(
    rename
      .is_usable(&target, FRAMEWORK, Where::ObjectForms)
      .is_not_vetoed()
  );
  assert!(rename.is_valid(&target, invocation, FRAMEWORK).is_vetoed());
}

#[test]
fn parameter_events_carry_the_arguments() {
  let model = metamodel();
  let seen = Arc::new(Mutex::new(Vec::new()));
  let recorder = Arc::clone(&seen);
  model.bus.subscribe(move |event| {
    recorder.lock().push((event.phase(), event.arguments().len()));
  });

  let target = ada(&model.customer);
  let parameter = model.customer.member("rename").unwrap().parameters()[0]
    .clone()
    .with_facet(DomainEventFacet::new(
      DomainEventKind::Action,
      Arc::clone(&model.bus),
    ));
  let args = [text("Grace")];

  assert!(parameter.is_visible(&target, &args, USER).is_not_vetoed());
  assert!(parameter.is_usable(&target, &args, USER).is_not_vetoed());
  assert!(parameter.is_valid(&target, &args, USER).is_not_vetoed());
  assert_eq!(*seen.lock(), [
    (EventPhase::Hide, 1),
    (EventPhase::Disable, 1),
    (EventPhase::Validate, 1),
  ]);
}


#[test]
fn subscriber_veto_blocks_execution() {
  let model = metamodel();
  model.bus.subscribe(|event| {
    if event.phase() == EventPhase::Executing {
      event.veto("frozen account");
    }
  });
  let target = ada(&model.customer);
  let rename = model.customer.member("rename").unwrap();

  let outcome = rename.execute(&target, &[text("Grace")], USER);
  match outcome {
    Err(Error::ExecutionVetoed { reason, .. }) => {
      assert_eq!(reason, "frozen account")
    }
    other => panic!("expected veto, got {other:?}"),
  }
}

#[test]
fn subscriber_may_replace_the_result() {
  let model = metamodel();
  model.bus.subscribe(|event| {
    if event.phase() == EventPhase::Executed {
      event.set_return_value(Some(text("Replaced")));
    }
  });
  let target = ada(&model.customer);
  let rename = model.customer.member("rename").unwrap();

  let result = rename.execute(&target, &[text("Grace")], USER).unwrap();
  assert_eq!(
    result.as_ref().and_then(|value| value.pojo_as::<String>()),
    Some(&"Replaced".to_string())
  );
}

#[test]
fn missing_argument_vetoes_execution() {
  let model = metamodel();
  let target = ada(&model.customer);
  let rename = model.customer.member("rename").unwrap();

  let checks = rename.validate_arguments(
    &target,
    &[ManagedObject::empty(text_spec())],
    USER,
  );
  assert_eq!(checks.len(), 2);
  assert_eq!(checks.first_vetoed().and_then(|r| r.reason()), Some("Mandatory"));
  assert!(matches!(
    rename.execute(&target, &[], USER),
    Err(Error::ExecutionVetoed { .. })
  ));
}

#[test]
fn domain_events_need_a_bus() {
  let loader = SpecificationLoader::new();
  loader.introspect(
    &ProgrammingModel::default(),
    &[TypeDescriptor::new("demo.Order")
      .member(MemberDescriptor::action("ship").annotate(Annotation::DomainEvent))],
    &ServiceRegistry::new(),
  );
  assert_eq!(loader.validation_failures().len(), 1);
}

#[test]
fn non_member_features_are_rejected() {
  let loader = SpecificationLoader::new();
  let specs = loader.introspect(
    &ProgrammingModel::default(),
    &[TypeDescriptor::new("demo.Order")
      .member(MemberDescriptor::new(FeatureType::Object, "self"))
      .member(MemberDescriptor::property("total"))
      .member(MemberDescriptor::property("total"))],
    &ServiceRegistry::new(),
  );
  assert_eq!(specs[0].members().count(), 1);
  assert_eq!(loader.validation_failures().len(), 2);
}
